use crate::domain::model::ProductId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Requested amount {requested} of product {product_id} exceeds stock ({available})")]
    OutOfStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    #[error("Product {product_id} is not in the cart")]
    ProductNotInCart { product_id: ProductId },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Upstream error: {message}")]
    UpstreamError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 錯誤分類，UI 層依此決定要顯示的通知
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    OutOfStock,
    ProductNotInCart,
    Upstream,
    Storage,
    Configuration,
}

impl CartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CartError::OutOfStock { .. } => ErrorCategory::OutOfStock,
            CartError::ProductNotInCart { .. } => ErrorCategory::ProductNotInCart,
            CartError::ApiError(_) | CartError::UpstreamError { .. } => ErrorCategory::Upstream,
            CartError::IoError(_) | CartError::SerializationError(_) => ErrorCategory::Storage,
            CartError::UrlError(_)
            | CartError::ConfigError { .. }
            | CartError::ConfigValidationError { .. }
            | CartError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::OutOfStock => "Requested quantity is out of stock".to_string(),
            ErrorCategory::ProductNotInCart => "That product is not in your cart".to_string(),
            ErrorCategory::Upstream => "The store could not be reached".to_string(),
            ErrorCategory::Storage => "The cart could not be saved or loaded".to_string(),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::OutOfStock => "Lower the quantity or try again later",
            ErrorCategory::ProductNotInCart => "Run `list` to see the products in your cart",
            ErrorCategory::Upstream => "Check --api-base-url and that the store API is running",
            ErrorCategory::Storage => "Check that --data-dir is writable and the cart file is valid JSON",
            ErrorCategory::Configuration => "Fix the configuration file or command line flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;
