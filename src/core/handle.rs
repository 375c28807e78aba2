use crate::core::cart_manager::CartManager;
use crate::core::{Cart, Notifier, ProductCatalog, StockService, Storage};
use crate::domain::model::{AmountUpdate, Outcome, ProductId};
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cloneable handle injected into every component that needs the cart.
///
/// The lock is held for the whole operation, stock and catalog fetches
/// included, so two adds of the same product can never both read the old amount.
pub struct CartHandle<A, S, N>
where
    A: StockService + ProductCatalog,
    S: Storage,
    N: Notifier,
{
    inner: Arc<Mutex<CartManager<A, S, N>>>,
}

impl<A, S, N> Clone for CartHandle<A, S, N>
where
    A: StockService + ProductCatalog,
    S: Storage,
    N: Notifier,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, S, N> CartHandle<A, S, N>
where
    A: StockService + ProductCatalog,
    S: Storage,
    N: Notifier,
{
    pub fn new(manager: CartManager<A, S, N>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    pub async fn snapshot(&self) -> Cart {
        self.inner.lock().await.cart().clone()
    }

    pub async fn add_product(&self, product_id: ProductId) -> Result<Outcome> {
        self.inner.lock().await.add_product(product_id).await
    }

    pub async fn remove_product(&self, product_id: ProductId) -> Result<Outcome> {
        self.inner.lock().await.remove_product(product_id).await
    }

    pub async fn update_product_amount(&self, update: AmountUpdate) -> Result<Outcome> {
        self.inner.lock().await.update_product_amount(update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::notify::CollectingNotifier;
    use crate::adapters::storage::MemoryStorage;
    use crate::core::persistence::CartRepository;
    use crate::domain::model::{Notice, Product, Stock};
    use crate::utils::error::CartError;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Yields inside every fetch so concurrent callers interleave.
    struct SlowStorefront {
        stock: u32,
    }

    #[async_trait]
    impl StockService for SlowStorefront {
        async fn get_stock(&self, product_id: ProductId) -> Result<Stock> {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(Stock {
                id: product_id,
                amount: self.stock,
            })
        }
    }

    #[async_trait]
    impl ProductCatalog for SlowStorefront {
        async fn get_product(&self, product_id: ProductId) -> Result<Product> {
            tokio::time::sleep(Duration::from_millis(10)).await;
            if product_id == 0 {
                return Err(CartError::UpstreamError {
                    message: "unknown product".to_string(),
                });
            }
            Ok(Product {
                id: product_id,
                title: "Tenis Runner".to_string(),
                price: 179.9,
                image: String::new(),
                extra: serde_json::Map::new(),
            })
        }
    }

    async fn handle(
        stock: u32,
    ) -> (
        CartHandle<SlowStorefront, MemoryStorage, CollectingNotifier>,
        CollectingNotifier,
    ) {
        let notifier = CollectingNotifier::new();
        let manager = CartManager::load(
            SlowStorefront { stock },
            CartRepository::with_default_key(MemoryStorage::new()),
            notifier.clone(),
        )
        .await
        .unwrap();
        (CartHandle::new(manager), notifier)
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_serialized() {
        let (cart, notifier) = handle(10).await;
        let other = cart.clone();

        let (first, second) = tokio::join!(cart.add_product(7), other.add_product(7));

        assert!(first.is_ok());
        assert!(second.is_ok());
        let snapshot = cart.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.amount_of(7), 2);
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_adds_respect_stock() {
        let (cart, notifier) = handle(1).await;
        let other = cart.clone();

        let (first, second) = tokio::join!(cart.add_product(7), other.add_product(7));

        assert_eq!([first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(), 1);
        assert_eq!(cart.snapshot().await.amount_of(7), 1);
        assert_eq!(notifier.notices(), vec![Notice::AddOutOfStock]);
    }

    #[tokio::test]
    async fn test_handle_update_and_remove() {
        let (cart, _) = handle(5).await;
        cart.add_product(3).await.unwrap();

        cart.update_product_amount(AmountUpdate::new(3, 4))
            .await
            .unwrap();
        assert_eq!(cart.snapshot().await.amount_of(3), 4);

        cart.remove_product(3).await.unwrap();
        assert!(cart.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_handle_can_be_shared_across_tasks() {
        let (cart, _) = handle(5).await;

        let worker = {
            let cart = cart.clone();
            tokio::spawn(async move { cart.add_product(2).await })
        };
        worker.await.unwrap().unwrap();

        assert_eq!(cart.snapshot().await.amount_of(2), 1);
    }
}
