//! Product and stock records returned by the stock service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ProductId;

/// Product metadata as served by the stock service.
///
/// Only `id` is interpreted. Everything else (title, price, image, ...) is
/// kept as raw JSON and copied into the cart unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Product {
    /// Create a product with no metadata beyond its ID.
    #[must_use]
    pub fn new(id: ProductId) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    /// Builder-style helper to attach a metadata field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Available quantity for a product at lookup time. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: ProductId,
    pub amount: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_keeps_unknown_fields() {
        let json = r#"{"id":1,"title":"Tênis de Caminhada","price":179.9,"image":"https://cdn/1.jpg"}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.fields.len(), 3);
        assert_eq!(product.fields["title"], "Tênis de Caminhada");
    }

    #[test]
    fn test_stock_record_ignores_extra_fields() {
        let stock: StockRecord = serde_json::from_str(r#"{"id":2,"amount":5}"#).unwrap();
        assert_eq!(stock.amount, 5);
    }

    #[test]
    fn test_stock_record_rejects_negative_amount() {
        assert!(serde_json::from_str::<StockRecord>(r#"{"id":2,"amount":-1}"#).is_err());
    }
}
