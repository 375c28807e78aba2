use crate::core::persistence::DEFAULT_CART_KEY;
use crate::core::ConfigProvider;
use crate::utils::error::{CartError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3333".to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub cart_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            cart_key: DEFAULT_CART_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub format: LogFormat,
}

impl CartConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CartError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CartError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CART_API_URL})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CartError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_url("api.base_url", &self.api.base_url)?;
        crate::utils::validation::validate_range(
            "api.timeout_seconds",
            self.api.timeout_seconds,
            1,
            300,
        )?;
        crate::utils::validation::validate_path("storage.data_dir", &self.storage.data_dir)?;
        crate::utils::validation::validate_non_empty_string(
            "storage.cart_key",
            &self.storage.cart_key,
        )?;
        Ok(())
    }
}

impl ConfigProvider for CartConfig {
    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }

    fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    fn cart_key(&self) -> &str {
        &self.storage.cart_key
    }
}

impl Validate for CartConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[api]
base_url = "https://shop.example.com/api"
timeout_seconds = 5

[storage]
data_dir = "/var/lib/cart"
cart_key = "@Shop:cart"

[logging]
verbose = true
format = "json"
"#;

        let config = CartConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_base_url(), "https://shop.example.com/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.data_dir(), "/var/lib/cart");
        assert_eq!(config.cart_key(), "@Shop:cart");
        assert!(config.logging.verbose);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = CartConfig::from_toml_str("[api]\ntimeout_seconds = 3\n").unwrap();

        assert_eq!(config.api_base_url(), "http://localhost:3333");
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.cart_key(), DEFAULT_CART_KEY);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CART_TEST_API_URL", "https://test.shop.com");

        let toml_content = r#"
[api]
base_url = "${CART_TEST_API_URL}"
"#;

        let config = CartConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api.base_url, "https://test.shop.com");

        std::env::remove_var("CART_TEST_API_URL");
    }

    #[test]
    fn test_unknown_env_var_is_left_in_place() {
        let toml_content = r#"
[storage]
data_dir = "${CART_TEST_UNSET_DIR}"
"#;

        let config = CartConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.storage.data_dir, "${CART_TEST_UNSET_DIR}");
    }

    #[test]
    fn test_config_validation() {
        let invalid_url = CartConfig::from_toml_str("[api]\nbase_url = \"invalid-url\"\n").unwrap();
        assert!(invalid_url.validate().is_err());

        let zero_timeout = CartConfig::from_toml_str("[api]\ntimeout_seconds = 0\n").unwrap();
        assert!(zero_timeout.validate().is_err());

        let blank_key = CartConfig::from_toml_str("[storage]\ncart_key = \" \"\n").unwrap();
        assert!(blank_key.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = CartConfig::from_toml_str("[api\nbase_url =").unwrap_err();
        assert!(matches!(err, CartError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[storage]
data_dir = "./file-test"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = CartConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.data_dir(), "./file-test");
    }
}
