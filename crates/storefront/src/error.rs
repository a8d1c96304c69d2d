//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::cart::{CartError, CartOperation};
use crate::stock::StockError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// A cart operation failed.
    #[error("Cart {operation:?} failed: {source}")]
    Cart {
        operation: CartOperation,
        #[source]
        source: CartError,
    },

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wrap a cart error together with the operation that produced it.
    #[must_use]
    pub const fn cart(operation: CartOperation, source: CartError) -> Self {
        Self::Cart { operation, source }
    }

    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Internal(_)
                | Self::Cart {
                    source: CartError::Stock(_) | CartError::Storage(_),
                    ..
                }
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Cart { source, .. } => match source {
                CartError::StockExceeded { .. } => StatusCode::CONFLICT,
                CartError::NotFound(_) => StatusCode::NOT_FOUND,
                CartError::Stock(StockError::RateLimited(_)) => StatusCode::SERVICE_UNAVAILABLE,
                CartError::Stock(_) => StatusCode::BAD_GATEWAY,
                CartError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the shopper.
    fn public_message(&self) -> String {
        match self {
            Self::Cart { operation, source } => source.user_message(*operation).to_string(),
            Self::BadRequest(_) => self.to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for cart actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart
/// changes leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use rocketshoes_core::ProductId;

    use super::*;
    use crate::cart::{
        ADD_FAILED_MESSAGE, REMOVE_FAILED_MESSAGE, STOCK_EXCEEDED_MESSAGE, UPDATE_FAILED_MESSAGE,
    };
    use crate::storage::StorageError;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid product id".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid product id");
    }

    #[test]
    fn test_cart_error_status_codes() {
        let id = ProductId::new(1);
        assert_eq!(
            get_status(AppError::cart(
                CartOperation::Add,
                CartError::StockExceeded {
                    product_id: id,
                    requested: 2,
                    available: 1
                }
            )),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::cart(CartOperation::Remove, CartError::NotFound(id))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::cart(
                CartOperation::Add,
                CartError::Stock(StockError::NotFound(id))
            )),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::cart(
                CartOperation::Update,
                CartError::Stock(StockError::RateLimited(3))
            )),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::cart(
                CartOperation::Update,
                CartError::Storage(StorageError::InvalidKey(String::new()))
            )),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_public_messages_hide_details() {
        let id = ProductId::new(1);
        let stock = AppError::cart(
            CartOperation::Update,
            CartError::StockExceeded {
                product_id: id,
                requested: 9,
                available: 1,
            },
        );
        assert_eq!(stock.public_message(), STOCK_EXCEEDED_MESSAGE);

        let add = AppError::cart(
            CartOperation::Add,
            CartError::Stock(StockError::Api {
                status: 500,
                message: "db exploded".to_string(),
            }),
        );
        assert_eq!(add.public_message(), ADD_FAILED_MESSAGE);

        let remove = AppError::cart(CartOperation::Remove, CartError::NotFound(id));
        assert_eq!(remove.public_message(), REMOVE_FAILED_MESSAGE);

        let update = AppError::cart(CartOperation::Update, CartError::NotFound(id));
        assert_eq!(update.public_message(), UPDATE_FAILED_MESSAGE);

        let internal = AppError::Internal("stack trace".to_string());
        assert_eq!(internal.public_message(), "Internal server error");
    }
}
