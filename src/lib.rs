pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CartCommand, CliConfig};

pub use adapters::{HttpStorefront, LocalStorage, MemoryStorage};
pub use config::{CartConfig, LogFormat};
pub use crate::core::{cart_manager::CartManager, handle::CartHandle, persistence::CartRepository};
pub use domain::model::{AmountUpdate, Cart, CartLine, Notice, Outcome, Product, ProductId, Stock};
pub use utils::error::{CartError, ErrorCategory, Result};
