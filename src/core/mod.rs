pub mod cart_manager;
pub mod handle;
pub mod persistence;

pub use crate::domain::model::{Cart, CartLine, Product, Stock};
pub use crate::domain::ports::{ConfigProvider, Notifier, ProductCatalog, StockService, Storage};
pub use crate::utils::error::Result;
