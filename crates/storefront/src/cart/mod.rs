//! Cart state management.
//!
//! [`CartStore`] owns the shopper's cart, validates quantity changes against
//! the stock service, and writes every accepted change through to a
//! [`PersistentSlot`](crate::storage::PersistentSlot).
//!
//! Every operation both returns its outcome and, on failure, sends a
//! user-facing message to the store's
//! [`NotificationSink`](crate::notify::NotificationSink).

mod store;

pub use store::CartStore;

use rocketshoes_core::ProductId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stock::StockError;
use crate::storage::StorageError;

/// Shown when a requested quantity is above the available stock.
pub const STOCK_EXCEEDED_MESSAGE: &str = "Requested quantity is out of stock";
pub const ADD_FAILED_MESSAGE: &str = "Error adding product";
pub const REMOVE_FAILED_MESSAGE: &str = "Error removing product";
pub const UPDATE_FAILED_MESSAGE: &str = "Error updating product quantity";

/// Request to set a line item's quantity.
///
/// `amount` is signed on purpose: UI decrement buttons may send zero or
/// negative values, which are ignored rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Successful outcome of a cart operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// The cart changed and was persisted.
    Applied,
    /// The request was a no-op by design (non-positive update amount).
    Skipped,
}

/// The cart operations, used to pick a user-facing failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    Update,
}

impl CartOperation {
    /// Generic failure message for this operation.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => ADD_FAILED_MESSAGE,
            Self::Remove => REMOVE_FAILED_MESSAGE,
            Self::Update => UPDATE_FAILED_MESSAGE,
        }
    }
}

/// Why a cart operation left the cart unchanged (or, for `Storage`, why the
/// change was not persisted).
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Requested {requested} of product {product_id}, only {available} in stock")]
    StockExceeded {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    #[error("Product {0} is not in the cart")]
    NotFound(ProductId),

    #[error("Stock service error: {0}")]
    Stock(#[from] StockError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CartError {
    /// Message to show the shopper when `operation` failed with this error.
    #[must_use]
    pub const fn user_message(&self, operation: CartOperation) -> &'static str {
        match self {
            Self::StockExceeded { .. } => STOCK_EXCEEDED_MESSAGE,
            _ => operation.failure_message(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_for_stock_exceeded() {
        let err = CartError::StockExceeded {
            product_id: ProductId::new(1),
            requested: 6,
            available: 5,
        };
        assert_eq!(err.user_message(CartOperation::Add), STOCK_EXCEEDED_MESSAGE);
        assert_eq!(err.user_message(CartOperation::Update), STOCK_EXCEEDED_MESSAGE);
        assert_eq!(err.to_string(), "Requested 6 of product 1, only 5 in stock");
    }

    #[test]
    fn test_user_message_is_generic_otherwise() {
        let err = CartError::NotFound(ProductId::new(3));
        assert_eq!(err.user_message(CartOperation::Remove), REMOVE_FAILED_MESSAGE);
        assert_eq!(err.user_message(CartOperation::Update), UPDATE_FAILED_MESSAGE);

        let err = CartError::Stock(StockError::NotFound(ProductId::new(3)));
        assert_eq!(err.user_message(CartOperation::Add), ADD_FAILED_MESSAGE);
    }

    #[test]
    fn test_update_request_accepts_negative_amount() {
        let request: UpdateProductAmount =
            serde_json::from_str(r#"{"product_id":1,"amount":-1}"#).unwrap();
        assert_eq!(request.amount, -1);
    }
}
