//! Stock service clients.
//!
//! The cart never trusts its own quantities: every add or update asks a
//! [`StockOracle`] how many units are available right now. Product metadata
//! comes from the same service and is copied into the cart as-is.
//!
//! # Adapters
//!
//! - [`HttpStockOracle`] - JSON API (`GET /stock/{id}`, `GET /products/{id}`)
//! - [`InMemoryStockOracle`] - fixed catalog, loaded from a JSON file or built in code

mod http;
mod memory;

pub use http::HttpStockOracle;
pub use memory::{Catalog, InMemoryStockOracle};

use async_trait::async_trait;
use rocketshoes_core::{Product, ProductId, StockRecord};
use thiserror::Error;

/// Errors that can occur when talking to the stock service.
#[derive(Debug, Error)]
pub enum StockError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// No stock or product record for this ID.
    #[error("Not found: product {0}")]
    NotFound(ProductId),

    /// Rate limited by the stock service.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Base URL could not be combined with a resource path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Read-only source of truth for stock levels and product metadata.
#[async_trait]
pub trait StockOracle: Send + Sync {
    /// Current available quantity for a product.
    async fn fetch_stock(&self, id: ProductId) -> Result<StockRecord, StockError>;

    /// Product metadata (title, price, image, ...) for a product.
    async fn fetch_product(&self, id: ProductId) -> Result<Product, StockError>;
}
