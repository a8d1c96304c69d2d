//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::config::StorefrontConfig;
use crate::notify::TracingNotifier;
use crate::stock::{HttpStockOracle, StockError};
use crate::storage::FileSlot;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Handlers reach the cart only
/// through it, so the store is scoped to the router it is attached to.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    cart: Arc<CartStore>,
}

impl AppState {
    /// Wrap an already constructed cart store.
    #[must_use]
    pub fn new(cart: Arc<CartStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cart }),
        }
    }

    /// Build the production stack: HTTP stock service, file-backed cart,
    /// notifications to the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the stock service client cannot be built.
    pub async fn from_config(config: &StorefrontConfig) -> Result<Self, StockError> {
        let oracle = HttpStockOracle::new(&config.stock)?;
        let slot = FileSlot::new(&config.storage_dir);
        let store = CartStore::load(Arc::new(oracle), Arc::new(slot), Arc::new(TracingNotifier)).await;
        Ok(Self::new(Arc::new(store)))
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }
}
