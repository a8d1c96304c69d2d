//! Cart and line item types.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s with at most one entry per
//! product. Its transformations never mutate in place: each returns the cart
//! that *would* result, so the caller can validate first and commit later.
//!
//! The JSON form is a plain array of line items, with product metadata
//! flattened next to `id` and `amount`:
//!
//! ```json
//! [{ "id": 1, "amount": 2, "title": "Tênis", "price": 179.9, "image": "..." }]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Price, Product, ProductId};

/// One product entry in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub amount: u32,
    /// Product metadata copied verbatim from the stock service.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl LineItem {
    /// Build a line item with `amount` units of `product`.
    ///
    /// A stray `amount` key in the product metadata is dropped so it cannot
    /// shadow the cart quantity when serialized.
    #[must_use]
    pub fn from_product(product: Product, amount: u32) -> Self {
        let mut fields = product.fields;
        fields.remove("amount");
        Self {
            id: product.id,
            amount,
            fields,
        }
    }

    /// Product title, if the metadata has one.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    /// Unit price, if the metadata carries a usable `price` field.
    #[must_use]
    pub fn unit_price(&self) -> Option<Price> {
        self.fields
            .get("price")
            .and_then(|value| Price::from_json(value).ok())
    }

    /// Unit price times amount. `None` without a usable price or on overflow.
    #[must_use]
    pub fn subtotal(&self) -> Option<Price> {
        self.unit_price()?.times(self.amount)
    }
}

/// Ordered sequence of line items, insertion order preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(Vec<LineItem>);

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Parse a persisted cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the snapshot is not an array of line items.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Serialize the cart to its persisted form.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if a metadata value cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.0.iter()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.0.iter().map(|item| u64::from(item.amount)).sum()
    }

    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&LineItem> {
        self.0.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.find(id).is_some()
    }

    /// Cart with `item` appended, or with the existing entry for the same
    /// product replaced in place.
    #[must_use]
    pub fn with_item(&self, item: LineItem) -> Self {
        let mut items = self.0.clone();
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        Self(items)
    }

    /// Cart with one item's amount replaced. `None` if the product is absent.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Option<Self> {
        let mut items = self.0.clone();
        let item = items.iter_mut().find(|item| item.id == id)?;
        item.amount = amount;
        Some(Self(items))
    }

    /// Cart without the given product. `None` if the product is absent.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        Some(Self(
            self.0.iter().filter(|item| item.id != id).cloned().collect(),
        ))
    }

    /// Sum of all line subtotals.
    ///
    /// Items without a usable price are skipped. `None` for an empty cart,
    /// when line items disagree on currency, or when the sum overflows.
    #[must_use]
    pub fn total(&self) -> Option<Price> {
        let mut total: Option<Price> = None;
        for item in &self.0 {
            let Some(unit) = item.unit_price() else {
                continue;
            };
            let line = unit.times(item.amount)?;
            total = Some(match total {
                Some(acc) => acc.checked_add(&line)?,
                None => line,
            });
        }
        total
    }
}

impl From<Vec<LineItem>> for Cart {
    fn from(items: Vec<LineItem>) -> Self {
        Self(items)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
