//! Catalog-backed stock oracle.
//!
//! Reads the same document shape the development stock server is seeded
//! with:
//!
//! ```json
//! {
//!   "products": [{ "id": 1, "title": "Tênis", "price": 179.9, "image": "..." }],
//!   "stock": [{ "id": 1, "amount": 3 }]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use rocketshoes_core::{Product, ProductId, StockRecord};
use serde::Deserialize;

use super::{StockError, StockOracle};

/// Catalog document: products plus their stock levels.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub stock: Vec<StockRecord>,
}

#[derive(Debug, Default)]
struct CatalogIndex {
    products: HashMap<ProductId, Product>,
    stock: HashMap<ProductId, u32>,
}

/// Stock oracle answering from an in-memory catalog.
///
/// Unknown IDs yield [`StockError::NotFound`]. Stock levels can be changed
/// at runtime to simulate purchases elsewhere.
#[derive(Debug, Default)]
pub struct InMemoryStockOracle {
    index: RwLock<CatalogIndex>,
}

impl InMemoryStockOracle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a parsed catalog.
    #[must_use]
    pub fn from_catalog(catalog: Catalog) -> Self {
        let oracle = Self::new();
        for product in catalog.products {
            oracle.insert_product(product);
        }
        for record in catalog.stock {
            oracle.set_stock(record.id, record.amount);
        }
        oracle
    }

    /// Load a catalog JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a catalog.
    pub async fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let raw = tokio::fs::read_to_string(path).await?;
        let catalog: Catalog = serde_json::from_str(&raw)?;
        tracing::debug!(
            path = %path.display(),
            products = catalog.products.len(),
            "Loaded stock catalog"
        );
        Ok(Self::from_catalog(catalog))
    }

    pub fn insert_product(&self, product: Product) {
        self.index
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .products
            .insert(product.id, product);
    }

    pub fn set_stock(&self, id: ProductId, amount: u32) {
        self.index
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .stock
            .insert(id, amount);
    }
}

#[async_trait]
impl StockOracle for InMemoryStockOracle {
    async fn fetch_stock(&self, id: ProductId) -> Result<StockRecord, StockError> {
        let index = self.index.read().unwrap_or_else(PoisonError::into_inner);
        index
            .stock
            .get(&id)
            .map(|&amount| StockRecord { id, amount })
            .ok_or(StockError::NotFound(id))
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Product, StockError> {
        let index = self.index.read().unwrap_or_else(PoisonError::into_inner);
        index
            .products
            .get(&id)
            .cloned()
            .ok_or(StockError::NotFound(id))
    }
}
