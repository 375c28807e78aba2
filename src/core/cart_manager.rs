use crate::core::persistence::CartRepository;
use crate::core::{Cart, Notifier, ProductCatalog, StockService, Storage};
use crate::domain::model::{
    AmountUpdate, CartLine, Notice, Notification, Operation, Outcome, ProductId,
};
use crate::utils::error::{CartError, ErrorCategory, Result};

/// Owns the authoritative cart and is the only writer to it and to its stored copy.
///
/// Every mutation is computed on a copy first; the copy replaces the live
/// cart and is persisted only once every check and fetch has succeeded.
pub struct CartManager<A, S, N>
where
    A: StockService + ProductCatalog,
    S: Storage,
    N: Notifier,
{
    api: A,
    repository: CartRepository<S>,
    notifier: N,
    cart: Cart,
}

impl<A, S, N> CartManager<A, S, N>
where
    A: StockService + ProductCatalog,
    S: Storage,
    N: Notifier,
{
    /// Restores the cart from storage, or starts empty when nothing was stored.
    pub async fn load(api: A, repository: CartRepository<S>, notifier: N) -> Result<Self> {
        let cart = repository.load().await?;
        tracing::info!(
            "🛒 Cart restored from '{}' with {} lines",
            repository.key(),
            cart.len()
        );

        Ok(Self {
            api,
            repository,
            notifier,
            cart,
        })
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub async fn add_product(&mut self, product_id: ProductId) -> Result<Outcome> {
        let result = match self.prepare_add(product_id).await {
            Ok(next) => self.commit(next).await,
            Err(e) => Err(e),
        };
        self.finish(Operation::AddProduct, product_id, result)
    }

    pub async fn remove_product(&mut self, product_id: ProductId) -> Result<Outcome> {
        let result = match self.prepare_remove(product_id) {
            Ok(next) => self.commit(next).await,
            Err(e) => Err(e),
        };
        self.finish(Operation::RemoveProduct, product_id, result)
    }

    /// Sets the line's amount to exactly `update.amount`.
    ///
    /// A zero or negative amount is ignored rather than treated as a removal.
    pub async fn update_product_amount(&mut self, update: AmountUpdate) -> Result<Outcome> {
        if update.amount <= 0 {
            tracing::debug!(
                "Ignoring non-positive amount {} for product {}",
                update.amount,
                update.product_id
            );
            return Ok(Outcome::Ignored);
        }

        let result = match self.prepare_update(update).await {
            Ok(next) => self.commit(next).await,
            Err(e) => Err(e),
        };
        self.finish(Operation::UpdateAmount, update.product_id, result)
    }

    async fn prepare_add(&self, product_id: ProductId) -> Result<Cart> {
        let current_amount = self.cart.amount_of(product_id);

        tracing::debug!("Checking stock for product {}", product_id);
        let stock = self.api.get_stock(product_id).await?;

        let desired = current_amount.saturating_add(1);
        if desired > stock.amount {
            return Err(CartError::OutOfStock {
                product_id,
                requested: desired,
                available: stock.amount,
            });
        }

        let mut next = self.cart.clone();
        if let Some(line) = next.get_mut(product_id) {
            line.amount = desired;
        } else {
            tracing::debug!("Fetching catalog entry for product {}", product_id);
            let product = self.api.get_product(product_id).await?;
            if product.id != product_id {
                return Err(CartError::UpstreamError {
                    message: format!(
                        "catalog returned product {} for id {}",
                        product.id, product_id
                    ),
                });
            }
            next.push(CartLine::new(product));
        }

        Ok(next)
    }

    fn prepare_remove(&self, product_id: ProductId) -> Result<Cart> {
        let mut next = self.cart.clone();
        next.remove(product_id)
            .ok_or(CartError::ProductNotInCart { product_id })?;
        Ok(next)
    }

    async fn prepare_update(&self, update: AmountUpdate) -> Result<Cart> {
        let product_id = update.product_id;
        if !self.cart.contains(product_id) {
            return Err(CartError::ProductNotInCart { product_id });
        }

        tracing::debug!("Checking stock for product {}", product_id);
        let stock = self.api.get_stock(product_id).await?;

        // 超過 u32 的數量一定超出庫存
        let requested = u32::try_from(update.amount).unwrap_or(u32::MAX);
        if requested > stock.amount {
            return Err(CartError::OutOfStock {
                product_id,
                requested,
                available: stock.amount,
            });
        }

        let mut next = self.cart.clone();
        if let Some(line) = next.get_mut(product_id) {
            line.amount = requested;
        }
        Ok(next)
    }

    /// Publishes `next` and writes it to storage; a failed write restores the previous cart.
    async fn commit(&mut self, next: Cart) -> Result<Outcome> {
        let previous = std::mem::replace(&mut self.cart, next);
        if let Err(e) = self.repository.save(&self.cart).await {
            self.cart = previous;
            return Err(e);
        }
        Ok(Outcome::Applied)
    }

    fn finish(
        &self,
        operation: Operation,
        product_id: ProductId,
        result: Result<Outcome>,
    ) -> Result<Outcome> {
        match &result {
            Ok(_) => {
                tracing::info!(
                    "✅ {} for product {} (cart now has {} lines)",
                    operation,
                    product_id,
                    self.cart.len()
                );
            }
            Err(e) => {
                let notice = notice_for(operation, e);
                tracing::warn!(
                    "❌ {} for product {} failed: {} (Category: {:?})",
                    operation,
                    product_id,
                    e,
                    e.category()
                );
                self.notifier.notify(Notification::error(notice));
            }
        }
        result
    }
}

/// Maps a failed operation to the notice shown to the user.
pub fn notice_for(operation: Operation, error: &CartError) -> Notice {
    let out_of_stock = error.category() == ErrorCategory::OutOfStock;
    match operation {
        Operation::AddProduct if out_of_stock => Notice::AddOutOfStock,
        Operation::AddProduct => Notice::AddFailed,
        Operation::RemoveProduct => Notice::RemoveFailed,
        Operation::UpdateAmount if out_of_stock => Notice::UpdateOutOfStock,
        Operation::UpdateAmount => Notice::UpdateFailed,
    }
}
