//! Cart route handlers.
//!
//! Every mutation responds with the updated cart summary so clients can
//! re-render without a second request. Failures carry the same message the
//! store sends to its notifier.

use axum::{Json, extract::State};
use rocketshoes_core::{Cart, LineItem, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::{CartOperation, Mutation, UpdateProductAmount};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Body for add and remove requests.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ProductRequest {
    pub product_id: ProductId,
}

/// Line item with display prices.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    #[serde(flatten)]
    pub item: LineItem,
    pub price_formatted: Option<String>,
    pub subtotal: Option<String>,
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            price_formatted: item.unit_price().map(|p| p.display()),
            subtotal: item.subtotal().map(|p| p.display()),
            item: item.clone(),
        }
    }
}

/// Cart summary returned by every cart endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CartSummary {
    pub items: Vec<CartItemView>,
    pub total: Option<String>,
    pub item_count: u64,
}

impl From<&Cart> for CartSummary {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.iter().map(CartItemView::from).collect(),
            total: cart.total().map(|p| p.display()),
            item_count: cart.item_count(),
        }
    }
}

/// Cart badge count: number of distinct products.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCount {
    pub count: usize,
}

async fn summary(state: &AppState) -> Json<CartSummary> {
    Json(CartSummary::from(&state.cart().cart().await))
}

fn record(operation: CartOperation, product_id: ProductId, mutation: Mutation) {
    if mutation == Mutation::Applied {
        let id = product_id.to_string();
        add_breadcrumb(
            "cart",
            &format!("Cart {operation:?} applied"),
            Some(&[("product_id", id.as_str())]),
        );
    }
}

/// Display cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartSummary> {
    summary(&state).await
}

/// Add one unit of a product.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<ProductRequest>,
) -> Result<Json<CartSummary>> {
    let mutation = state
        .cart()
        .add_product(request.product_id)
        .await
        .map_err(|e| AppError::cart(CartOperation::Add, e))?;
    record(CartOperation::Add, request.product_id, mutation);
    Ok(summary(&state).await)
}

/// Set a line item's quantity.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateProductAmount>,
) -> Result<Json<CartSummary>> {
    let mutation = state
        .cart()
        .update_product_amount(request)
        .await
        .map_err(|e| AppError::cart(CartOperation::Update, e))?;
    record(CartOperation::Update, request.product_id, mutation);
    Ok(summary(&state).await)
}

/// Remove a line item.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(request): Json<ProductRequest>,
) -> Result<Json<CartSummary>> {
    let mutation = state
        .cart()
        .remove_product(request.product_id)
        .await
        .map_err(|e| AppError::cart(CartOperation::Remove, e))?;
    record(CartOperation::Remove, request.product_id, mutation);
    Ok(summary(&state).await)
}

/// Get cart count badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCount> {
    Json(CartCount {
        count: state.cart().cart().await.len(),
    })
}
