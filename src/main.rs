use anyhow::Context;
use clap::Parser;
use storefront_cart::adapters::ConsoleNotifier;
use storefront_cart::core::ConfigProvider;
use storefront_cart::utils::{logger, validation::Validate};
use storefront_cart::{
    AmountUpdate, Cart, CartCommand, CartManager, CartRepository, CliConfig, HttpStorefront,
    LocalStorage, LogFormat, Outcome,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入並合併配置
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    match config.logging.format {
        LogFormat::Compact => logger::init_cli_logger(config.logging.verbose),
        LogFormat::Json => logger::init_json_logger(config.logging.verbose),
    }
    tracing::debug!("Resolved config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let api = HttpStorefront::from_config(&config).context("failed to build storefront client")?;
    let storage = LocalStorage::new(config.data_dir());
    let repository = CartRepository::new(storage, config.cart_key());

    let mut manager = CartManager::load(api, repository, ConsoleNotifier)
        .await
        .with_context(|| format!("failed to load cart from {}", config.data_dir()))?;

    let result = match cli.command {
        CartCommand::List => Ok(Outcome::Applied),
        CartCommand::Add { product_id } => manager.add_product(product_id).await,
        CartCommand::Remove { product_id } => manager.remove_product(product_id).await,
        CartCommand::Update { product_id, amount } => {
            manager
                .update_product_amount(AmountUpdate::new(product_id, amount))
                .await
        }
    };

    match result {
        Ok(Outcome::Applied) => print_cart(manager.cart()),
        Ok(Outcome::Ignored) => {
            println!("Amount must be at least 1; cart left unchanged.");
            print_cart(manager.cart());
        }
        Err(e) => {
            // 通知已由 ConsoleNotifier 輸出，這裡只補充建議
            tracing::debug!("Operation failed (Category: {:?}): {}", e.category(), e);
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    }

    Ok(())
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("🛒 Cart is empty");
        return;
    }

    println!("🛒 Cart ({} items)", cart.item_count());
    for line in cart.iter() {
        println!(
            "  #{:<6} {:<40} {:>4} x {:>10.2} = {:>10.2}",
            line.id(),
            line.product.title,
            line.amount,
            line.product.price,
            line.line_total()
        );
    }
    println!("  Subtotal: {:.2}", cart.subtotal());
}
