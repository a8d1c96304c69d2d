//! Cart commands.
//!
//! Opens the same `CartStore` the storefront serves, backed by the file slot
//! in `--storage-dir`, so a cart edited here shows up in the API and back.
//!
//! # Environment Variables
//!
//! - `STOCK_API_URL` - Stock service base URL (unless `--catalog` is given)
//! - `STOCK_API_TOKEN` - Optional bearer token
//! - `CART_STORAGE_DIR` - Default for `--storage-dir`

use std::path::Path;
use std::sync::Arc;

use rocketshoes_core::{Cart, ProductId};
use rocketshoes_storefront::cart::{CartError, CartStore, Mutation, UpdateProductAmount};
use rocketshoes_storefront::config::{ConfigError, StockApiConfig};
use rocketshoes_storefront::notify::NotificationLog;
use rocketshoes_storefront::stock::{HttpStockOracle, InMemoryStockOracle, StockError, StockOracle};
use rocketshoes_storefront::storage::FileSlot;
use thiserror::Error;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Stock API configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Stock service client could not be built.
    #[error("Stock service error: {0}")]
    Stock(#[from] StockError),

    /// Catalog file could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// The cart rejected the change.
    #[error("{message} ({source})")]
    Cart {
        message: String,
        #[source]
        source: CartError,
    },
}

/// A cart operation requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Show,
    Add(ProductId),
    Remove(ProductId),
    Update { product_id: ProductId, amount: i64 },
}

/// An opened cart plus the notifications it produced.
#[derive(Debug)]
pub struct CartSession {
    store: CartStore,
    notifications: Arc<NotificationLog>,
}

/// Open the persisted cart.
///
/// Uses the catalog file when given, otherwise the stock API from the
/// environment.
///
/// # Errors
///
/// Returns `CliError` if the catalog cannot be read or the stock API is not
/// configured.
pub async fn open(catalog: Option<&Path>, storage_dir: &Path) -> Result<CartSession, CliError> {
    let oracle: Arc<dyn StockOracle> = match catalog {
        Some(path) => Arc::new(
            InMemoryStockOracle::from_file(path)
                .await
                .map_err(|e| CliError::Catalog(format!("{}: {e}", path.display())))?,
        ),
        None => Arc::new(HttpStockOracle::new(&StockApiConfig::from_env()?)?),
    };

    let notifications = Arc::new(NotificationLog::new());
    let store = CartStore::load(
        oracle,
        Arc::new(FileSlot::new(storage_dir)),
        notifications.clone(),
    )
    .await;

    Ok(CartSession {
        store,
        notifications,
    })
}

impl CartSession {
    /// Run one action and return the resulting cart.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Cart` with the user-facing message if the store
    /// rejected the change.
    pub async fn apply(&self, action: Action) -> Result<Cart, CliError> {
        let result = match action {
            Action::Show => Ok(Mutation::Skipped),
            Action::Add(product_id) => self.store.add_product(product_id).await,
            Action::Remove(product_id) => self.store.remove_product(product_id).await,
            Action::Update { product_id, amount } => {
                let outcome = self
                    .store
                    .update_product_amount(UpdateProductAmount { product_id, amount })
                    .await;
                if matches!(outcome, Ok(Mutation::Skipped)) {
                    tracing::info!(amount, "Quantity must be at least 1, cart unchanged");
                }
                outcome
            }
        };

        match result {
            Ok(_) => Ok(self.store.cart().await),
            Err(source) => {
                let message = self.notifications.drain().join("; ");
                Err(CliError::Cart { message, source })
            }
        }
    }
}

/// Print the cart as a table.
#[allow(clippy::print_stdout)]
pub fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }

    for item in cart {
        let title = item.title().unwrap_or("(untitled)");
        let subtotal = item
            .subtotal()
            .map_or_else(|| "-".to_string(), |p| p.display());
        println!(
            "{:>5}  {:>3} x  {:<40}  {}",
            item.id.as_i32(),
            item.amount,
            title,
            subtotal
        );
    }

    if let Some(total) = cart.total() {
        println!("Total: {}", total.display());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "products": [
            { "id": 1, "title": "Tênis de Caminhada Leve Confortável", "price": 179.9 },
            { "id": 2, "title": "Tênis VR Caminhada Confortável", "price": 139.9 }
        ],
        "stock": [{ "id": 1, "amount": 3 }, { "id": 2, "amount": 1 }]
    }"#;

    struct Fixture {
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join("server.json"), CATALOG).unwrap();
            Self { dir }
        }

        async fn session(&self) -> CartSession {
            open(
                Some(&self.dir.path().join("server.json")),
                &self.dir.path().join("cart"),
            )
            .await
            .unwrap()
        }
    }

    #[tokio::test]
    async fn test_cart_survives_between_invocations() {
        let fixture = Fixture::new();

        fixture.session().await.apply(Action::Add(ProductId::new(1))).await.unwrap();
        fixture.session().await.apply(Action::Add(ProductId::new(1))).await.unwrap();
        let cart = fixture.session().await.apply(Action::Show).await.unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].amount, 2);
    }

    #[tokio::test]
    async fn test_rejection_carries_notification() {
        let fixture = Fixture::new();
        let session = fixture.session().await;
        session.apply(Action::Add(ProductId::new(2))).await.unwrap();

        let err = session
            .apply(Action::Update {
                product_id: ProductId::new(2),
                amount: 2,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CliError::Cart {
                source: CartError::StockExceeded { .. },
                ..
            }
        ));
        assert!(err.to_string().starts_with("Requested quantity is out of stock"));
    }

    #[tokio::test]
    async fn test_update_to_zero_is_not_an_error() {
        let fixture = Fixture::new();
        let session = fixture.session().await;
        session.apply(Action::Add(ProductId::new(1))).await.unwrap();

        let cart = session
            .apply(Action::Update {
                product_id: ProductId::new(1),
                amount: 0,
            })
            .await
            .unwrap();
        assert_eq!(cart.items()[0].amount, 1);
    }

    #[tokio::test]
    async fn test_missing_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = open(Some(&dir.path().join("nope.json")), dir.path()).await;
        assert!(matches!(result, Err(CliError::Catalog(_))));
    }
}
