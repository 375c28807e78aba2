use crate::config::toml_config::{CartConfig, LogFormat};
use crate::domain::model::ProductId;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "storefront-cart")]
#[command(about = "Manage a storefront shopping cart from the command line")]
pub struct CliConfig {
    #[arg(long, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Base URL of the storefront API (overrides the config file)")]
    pub api_base_url: Option<String>,

    #[arg(long, help = "Directory where the cart is stored (overrides the config file)")]
    pub data_dir: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CartCommand {
    /// Show the products in the cart
    List,
    /// Add one unit of a product
    Add { product_id: ProductId },
    /// Remove a product line from the cart
    Remove { product_id: ProductId },
    /// Set the amount of a product already in the cart
    Update {
        product_id: ProductId,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

impl CliConfig {
    /// 合併設定檔與命令列參數，命令列優先
    pub fn resolve(&self) -> Result<CartConfig> {
        let mut config = match &self.config {
            Some(path) => CartConfig::from_file(path)?,
            None => CartConfig::default(),
        };

        if let Some(base_url) = &self.api_base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }
        if self.verbose {
            config.logging.verbose = true;
        }
        if self.log_json {
            config.logging.format = LogFormat::Json;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_update_with_negative_amount() {
        let cli = CliConfig::try_parse_from(["storefront-cart", "update", "3", "-1"]).unwrap();
        match cli.command {
            CartCommand::Update { product_id, amount } => {
                assert_eq!(product_id, 3);
                assert_eq!(amount, -1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_without_file_uses_defaults() {
        let cli = CliConfig::try_parse_from(["storefront-cart", "list"]).unwrap();
        let config = cli.resolve().unwrap();

        assert_eq!(config.api_base_url(), "http://localhost:3333");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[api]\nbase_url = \"https://file.example.com\"\n[storage]\ndata_dir = \"./from-file\"\n")
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::try_parse_from([
            "storefront-cart",
            "--config",
            path.as_str(),
            "--api-base-url",
            "http://localhost:9999",
            "--log-json",
            "add",
            "5",
        ])
        .unwrap();
        let config = cli.resolve().unwrap();

        assert_eq!(config.api_base_url(), "http://localhost:9999");
        assert_eq!(config.data_dir(), "./from-file");
        assert_eq!(config.logging.format, LogFormat::Json);
    }
}
