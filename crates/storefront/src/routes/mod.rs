//! HTTP route handlers for the cart API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//!
//! # Cart (JSON)
//! GET  /cart                   - Cart summary
//! POST /cart/add               - Add one unit       { "product_id": 1 }
//! POST /cart/update            - Set quantity       { "product_id": 1, "amount": 3 }
//! POST /cart/remove            - Remove line item   { "product_id": 1 }
//! GET  /cart/count             - Distinct product count
//! ```

pub mod cart;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the full application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/cart", cart_routes())
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the stock service.
async fn health() -> &'static str {
    "ok"
}
