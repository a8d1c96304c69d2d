//! Integration tests for RocketShoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - End-to-end cart flows over the file slot
//! - `http_stock` - `HttpStockOracle` against a local stub stock service
//!
//! The stub service binds to an ephemeral port on 127.0.0.1, so no external
//! services are needed.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rocketshoes_storefront::config::StockApiConfig;
use serde_json::{Value, json};

/// Request counters for the stub stock service.
#[derive(Debug, Default)]
pub struct StubCounters {
    pub stock_requests: AtomicUsize,
    pub product_requests: AtomicUsize,
}

impl StubCounters {
    #[must_use]
    pub fn stock(&self) -> usize {
        self.stock_requests.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn products(&self) -> usize {
        self.product_requests.load(Ordering::SeqCst)
    }
}

/// Catalog served by the stub: products 1-3 with stock 5, 1, 0.
/// Product 500 always fails with a server error.
#[must_use]
pub fn stub_catalog() -> Value {
    json!({
        "products": [
            { "id": 1, "title": "Tênis de Caminhada Leve Confortável", "price": 179.9, "image": "https://cdn.rocketshoes/1.jpg" },
            { "id": 2, "title": "Tênis VR Caminhada Confortável Detalhes Couro Masculino", "price": 139.9, "image": "https://cdn.rocketshoes/2.jpg" },
            { "id": 3, "title": "Tênis Adidas Duramo Lite 2.0", "price": 219.9, "image": "https://cdn.rocketshoes/3.jpg" }
        ],
        "stock": [
            { "id": 1, "amount": 5 },
            { "id": 2, "amount": 1 },
            { "id": 3, "amount": 0 }
        ]
    })
}

fn find(catalog: &Value, table: &str, id: i32) -> Option<Value> {
    catalog[table]
        .as_array()?
        .iter()
        .find(|entry| entry["id"] == id)
        .cloned()
}

#[derive(Clone)]
struct StubState {
    catalog: Arc<Value>,
    counters: Arc<StubCounters>,
}

async fn stub_stock(
    State(state): State<StubState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, (StatusCode, String)> {
    state.counters.stock_requests.fetch_add(1, Ordering::SeqCst);
    if id == 500 {
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()));
    }
    find(&state.catalog, "stock", id)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "{}".to_string()))
}

async fn stub_product(
    State(state): State<StubState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, (StatusCode, String)> {
    state.counters.product_requests.fetch_add(1, Ordering::SeqCst);
    find(&state.catalog, "products", id)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "{}".to_string()))
}

/// Start the stub stock service and return its address and counters.
///
/// # Panics
///
/// Panics if the listener cannot bind.
#[allow(clippy::unwrap_used)]
pub async fn spawn_stub_stock_service() -> (SocketAddr, Arc<StubCounters>) {
    let counters = Arc::new(StubCounters::default());
    let state = StubState {
        catalog: Arc::new(stub_catalog()),
        counters: counters.clone(),
    };

    let app = Router::new()
        .route("/stock/{id}", get(stub_stock))
        .route("/products/{id}", get(stub_product))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, counters)
}

/// Stock API config pointing at a stub service.
///
/// # Panics
///
/// Panics if the address does not form a valid URL.
#[allow(clippy::unwrap_used)]
#[must_use]
pub fn stub_config(addr: SocketAddr) -> StockApiConfig {
    StockApiConfig {
        base_url: url::Url::parse(&format!("http://{addr}")).unwrap(),
        token: None,
        timeout: Duration::from_secs(5),
        product_cache_ttl: Duration::from_secs(60),
    }
}
