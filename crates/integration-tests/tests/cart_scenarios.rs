//! End-to-end cart flows: HTTP stock service, file-backed slot, and the JSON
//! cart API wired together the way the storefront binary does it.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use rocketshoes_core::{Cart, ProductId};
use rocketshoes_integration_tests::{spawn_stub_stock_service, stub_config};
use rocketshoes_storefront::cart::{
    ADD_FAILED_MESSAGE, CartError, CartStore, Mutation, STOCK_EXCEEDED_MESSAGE,
    UpdateProductAmount,
};
use rocketshoes_storefront::notify::NotificationLog;
use rocketshoes_storefront::routes::routes;
use rocketshoes_storefront::state::AppState;
use rocketshoes_storefront::stock::HttpStockOracle;
use rocketshoes_storefront::storage::{CART_STORAGE_KEY, FileSlot, PersistentSlot};
use serde_json::{Value, json};
use tower::ServiceExt;

struct Shop {
    store: CartStore,
    slot: Arc<FileSlot>,
    log: Arc<NotificationLog>,
    _dir: tempfile::TempDir,
}

async fn open_shop() -> Shop {
    let (addr, _) = spawn_stub_stock_service().await;
    let dir = tempfile::tempdir().unwrap();
    let slot = Arc::new(FileSlot::new(dir.path()));
    let log = Arc::new(NotificationLog::new());
    let oracle = Arc::new(HttpStockOracle::new(&stub_config(addr)).unwrap());
    let store = CartStore::load(oracle, slot.clone(), log.clone()).await;
    Shop {
        store,
        slot,
        log,
        _dir: dir,
    }
}

async fn open_store(addr: SocketAddr, dir: &Path) -> CartStore {
    CartStore::load(
        Arc::new(HttpStockOracle::new(&stub_config(addr)).unwrap()),
        Arc::new(FileSlot::new(dir)),
        Arc::new(NotificationLog::new()),
    )
    .await
}

async fn persisted(slot: &FileSlot) -> Cart {
    Cart::from_json(&slot.read(CART_STORAGE_KEY).await.unwrap().unwrap()).unwrap()
}

#[tokio::test]
async fn test_add_add_update_remove() {
    let shop = open_shop().await;
    let id = ProductId::new(1);

    // Empty cart, stock 5: first add creates the line item
    shop.store.add_product(id).await.unwrap();
    let cart = shop.store.cart().await;
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.items()[0].amount, 1);
    assert_eq!(
        cart.items()[0].title(),
        Some("Tênis de Caminhada Leve Confortável")
    );

    // Second add increments
    shop.store.add_product(id).await.unwrap();
    assert_eq!(shop.store.cart().await.items()[0].amount, 2);

    // Above stock: unchanged, stock notification
    let result = shop
        .store
        .update_product_amount(UpdateProductAmount {
            product_id: id,
            amount: 10,
        })
        .await;
    assert!(matches!(result, Err(CartError::StockExceeded { available: 5, .. })));
    assert_eq!(shop.store.cart().await.items()[0].amount, 2);
    assert_eq!(shop.log.drain(), vec![STOCK_EXCEEDED_MESSAGE]);

    // Remove empties the cart
    assert_eq!(shop.store.remove_product(id).await.unwrap(), Mutation::Applied);
    assert!(shop.store.cart().await.is_empty());
    assert!(persisted(&shop.slot).await.is_empty());
}

#[tokio::test]
async fn test_last_unit_then_sold_out() {
    let shop = open_shop().await;

    // Product 2 has a single unit
    shop.store.add_product(ProductId::new(2)).await.unwrap();
    assert!(shop.store.add_product(ProductId::new(2)).await.is_err());

    // Product 3 is sold out: the first unit goes in unchecked, the second does not
    shop.store.add_product(ProductId::new(3)).await.unwrap();
    assert!(shop.store.add_product(ProductId::new(3)).await.is_err());

    let cart = shop.store.cart().await;
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.items()[0].amount, 1);
    assert_eq!(cart.items()[1].amount, 1);
    assert_eq!(
        shop.log.messages(),
        vec![STOCK_EXCEEDED_MESSAGE, STOCK_EXCEEDED_MESSAGE]
    );
}

#[tokio::test]
async fn test_service_error_leaves_cart_alone() {
    let shop = open_shop().await;
    shop.store.add_product(ProductId::new(1)).await.unwrap();
    let before = shop.store.cart().await;

    assert!(shop.store.add_product(ProductId::new(500)).await.is_err());
    assert!(shop.store.add_product(ProductId::new(404)).await.is_err());

    assert_eq!(shop.store.cart().await, before);
    assert_eq!(persisted(&shop.slot).await, before);
    assert_eq!(
        shop.log.messages(),
        vec![ADD_FAILED_MESSAGE, ADD_FAILED_MESSAGE]
    );
}

#[tokio::test]
async fn test_new_session_picks_up_persisted_cart() {
    let (addr, counters) = spawn_stub_stock_service().await;
    let dir = tempfile::tempdir().unwrap();

    let first = open_store(addr, dir.path()).await;
    first.add_product(ProductId::new(1)).await.unwrap();
    first.add_product(ProductId::new(2)).await.unwrap();
    let requests_before = counters.stock();

    let second = open_store(addr, dir.path()).await;
    assert_eq!(second.cart().await, first.cart().await);
    // Loading does not revalidate against stock
    assert_eq!(counters.stock(), requests_before);
}

#[tokio::test]
async fn test_json_api_over_live_stack() {
    let shop = open_shop().await;
    let app = routes().with_state(AppState::new(Arc::new(shop.store)));

    let post = |uri: &str, body: Value| {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let response = app
        .clone()
        .oneshot(post("/cart/add", json!({ "product_id": 1 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post("/cart/update", json!({ "product_id": 1, "amount": 6 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/cart").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["items"][0]["id"], 1);
    assert_eq!(body["total"], "R$ 179.90");
    assert_eq!(persisted(&shop.slot).await.len(), 1);
}
