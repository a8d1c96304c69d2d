use std::sync::Arc;

use rocketshoes_core::{Cart, LineItem, ProductId};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use super::{CartError, CartOperation, Mutation, UpdateProductAmount};
use crate::notify::NotificationSink;
use crate::stock::StockOracle;
use crate::storage::{CART_STORAGE_KEY, PersistentSlot, StorageError};

/// Holds the shopper's cart and applies validated changes to it.
///
/// Create one per session with [`CartStore::load`] and share it via `Arc`.
///
/// # Concurrency
///
/// Each operation snapshots the cart, awaits the stock service with no lock
/// held, then replaces the whole cart on commit. Two operations racing on the
/// same product are not coordinated: the last commit wins and the other
/// change is lost. The stock check on add compares against the amount seen
/// in the snapshot, not a value re-read after the stock lookup.
pub struct CartStore {
    cart: RwLock<Cart>,
    oracle: Arc<dyn StockOracle>,
    slot: Arc<dyn PersistentSlot>,
    notifier: Arc<dyn NotificationSink>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create a store seeded from the persisted cart, if any.
    ///
    /// A missing snapshot starts an empty cart. An unreadable or corrupt
    /// snapshot is logged and also starts an empty cart. Quantities are not
    /// revalidated against stock here.
    pub async fn load(
        oracle: Arc<dyn StockOracle>,
        slot: Arc<dyn PersistentSlot>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let cart = match slot.read(CART_STORAGE_KEY).await {
            Ok(Some(raw)) => Cart::from_json(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding unparseable persisted cart");
                Cart::new()
            }),
            Ok(None) => {
                debug!("No persisted cart, starting empty");
                Cart::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted cart, starting empty");
                Cart::new()
            }
        };

        info!(items = cart.len(), "Cart loaded");

        Self {
            cart: RwLock::new(cart),
            oracle,
            slot,
            notifier,
        }
    }

    /// Snapshot of the current cart.
    pub async fn cart(&self) -> Cart {
        self.cart.read().await.clone()
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing line item, or appends a new one with amount 1
    /// and the product's metadata. Only an increment is checked against stock.
    ///
    /// # Errors
    ///
    /// - `CartError::StockExceeded` if an increment would exceed stock
    /// - `CartError::Stock` if the stock or product lookup fails
    /// - `CartError::Storage` if the new cart could not be persisted
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<Mutation, CartError> {
        let result = self.try_add(product_id).await;
        self.report(CartOperation::Add, result)
    }

    /// Remove a product's line item entirely.
    ///
    /// # Errors
    ///
    /// - `CartError::NotFound` if the product is not in the cart
    /// - `CartError::Storage` if the new cart could not be persisted
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<Mutation, CartError> {
        let result = self.try_remove(product_id).await;
        self.report(CartOperation::Remove, result)
    }

    /// Set a line item's amount.
    ///
    /// Non-positive amounts return `Mutation::Skipped` without touching the
    /// cart or notifying anyone.
    ///
    /// # Errors
    ///
    /// - `CartError::Stock` if the stock lookup fails
    /// - `CartError::NotFound` if the product is not in the cart
    /// - `CartError::StockExceeded` if the amount is above available stock
    /// - `CartError::Storage` if the new cart could not be persisted
    #[instrument(skip(self), fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn update_product_amount(
        &self,
        request: UpdateProductAmount,
    ) -> Result<Mutation, CartError> {
        if request.amount <= 0 {
            debug!("Ignoring non-positive amount");
            return Ok(Mutation::Skipped);
        }

        let result = self.try_update(request).await;
        self.report(CartOperation::Update, result)
    }

    async fn try_add(&self, product_id: ProductId) -> Result<Mutation, CartError> {
        let snapshot = self.cart().await;
        let stock = self.oracle.fetch_stock(product_id).await?;

        let next = if let Some(existing) = snapshot.find(product_id) {
            let requested = existing.amount.saturating_add(1);
            ensure_in_stock(product_id, requested, stock.amount)?;
            snapshot
                .with_amount(product_id, requested)
                .ok_or(CartError::NotFound(product_id))?
        } else {
            let product = self.oracle.fetch_product(product_id).await?;
            snapshot.with_item(LineItem::from_product(product, 1))
        };

        self.commit(next).await?;
        Ok(Mutation::Applied)
    }

    async fn try_remove(&self, product_id: ProductId) -> Result<Mutation, CartError> {
        let next = self
            .cart()
            .await
            .without(product_id)
            .ok_or(CartError::NotFound(product_id))?;

        self.commit(next).await?;
        Ok(Mutation::Applied)
    }

    async fn try_update(&self, request: UpdateProductAmount) -> Result<Mutation, CartError> {
        let UpdateProductAmount { product_id, amount } = request;
        let snapshot = self.cart().await;
        let stock = self.oracle.fetch_stock(product_id).await?;

        // Anything beyond u32 is above any stock level anyway
        let requested = u32::try_from(amount).unwrap_or(u32::MAX);
        let next = snapshot
            .with_amount(product_id, requested)
            .ok_or(CartError::NotFound(product_id))?;
        ensure_in_stock(product_id, requested, stock.amount)?;

        self.commit(next).await?;
        Ok(Mutation::Applied)
    }

    /// Replace the in-memory cart and write it through to the slot.
    ///
    /// A failed write is not rolled back: memory keeps the new cart while the
    /// slot keeps the previous snapshot.
    async fn commit(&self, cart: Cart) -> Result<(), StorageError> {
        let snapshot = cart.to_json()?;
        let items = cart.len();

        *self.cart.write().await = cart;
        self.slot.write(CART_STORAGE_KEY, &snapshot).await?;

        debug!(items, "Cart committed");
        Ok(())
    }

    /// Log a failed operation and forward its message to the notifier.
    fn report(
        &self,
        operation: CartOperation,
        result: Result<Mutation, CartError>,
    ) -> Result<Mutation, CartError> {
        if let Err(e) = &result {
            match e {
                CartError::StockExceeded { .. } | CartError::NotFound(_) => {
                    warn!(?operation, error = %e, "Cart operation rejected");
                }
                CartError::Stock(_) | CartError::Storage(_) => {
                    error!(?operation, error = %e, "Cart operation failed");
                }
            }
            self.notifier.error(e.user_message(operation));
        }
        result
    }
}

const fn ensure_in_stock(
    product_id: ProductId,
    requested: u32,
    available: u32,
) -> Result<(), CartError> {
    if requested > available {
        return Err(CartError::StockExceeded {
            product_id,
            requested,
            available,
        });
    }
    Ok(())
}
