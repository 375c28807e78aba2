use crate::core::{Cart, Storage};
use crate::utils::error::Result;

pub const DEFAULT_CART_KEY: &str = "@RocketShoes:cart";

/// Reads and writes the whole cart as one JSON array under a fixed key.
pub struct CartRepository<S: Storage> {
    storage: S,
    key: String,
}

impl<S: Storage> CartRepository<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn with_default_key(storage: S) -> Self {
        Self::new(storage, DEFAULT_CART_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn load(&self) -> Result<Cart> {
        match self.storage.read(&self.key).await? {
            Some(bytes) => {
                let cart = decode(&bytes)?;
                tracing::debug!("Loaded cart with {} lines from '{}'", cart.len(), self.key);
                Ok(cart)
            }
            None => {
                tracing::debug!("No stored cart under '{}', starting empty", self.key);
                Ok(Cart::new())
            }
        }
    }

    pub async fn save(&self, cart: &Cart) -> Result<()> {
        let bytes = encode(cart)?;
        self.storage.write(&self.key, &bytes).await?;
        tracing::debug!("Persisted cart ({} lines, {} bytes)", cart.len(), bytes.len());
        Ok(())
    }
}

pub fn encode(cart: &Cart) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(cart)?)
}

pub fn decode(bytes: &[u8]) -> Result<Cart> {
    Ok(serde_json::from_slice(bytes)?)
}
