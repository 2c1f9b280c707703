//! Integration tests for the order desk.
//!
//! These tests build a throwaway orders directory the way the external
//! writer does and drive the public store and HTTP APIs against it.

use std::fs;
use std::path::Path;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use order_desk::api::{create_router, AppState};
use order_desk::store::{order_file_name, Candidate, OrderStore, StoreLocator};
use order_desk::{Config, StoreError};

/// Write an order the way the record writer does: pretty JSON with a
/// timestamp and a nested `order` object.
fn write_order(dir: &Path, id: &str, order: Value) {
    let record = json!({
        "timestamp": "2025-01-01T09:30:00.000000",
        "order": order,
    });
    fs::write(
        dir.join(order_file_name(id)),
        serde_json::to_string_pretty(&record).unwrap(),
    )
    .unwrap();
}

async fn get_json(store: OrderStore, uri: &str) -> (StatusCode, Value) {
    let app = create_router(AppState::new(store));
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn resolved_directory_feeds_the_store() {
    let tmp = TempDir::new().unwrap();
    let preferred = tmp.path().join("backend").join("orders");
    let fallback = tmp.path().join("orders");
    fs::create_dir_all(&fallback).unwrap();
    write_order(&fallback, "1", json!({"drinkType": "latte"}));

    let dir = StoreLocator::new(vec![
        Candidate::Explicit(preferred.clone()),
        Candidate::Explicit(fallback.clone()),
    ])
    .resolve()
    .unwrap();

    assert_eq!(dir, fallback);
    assert!(!preferred.exists());
    assert_eq!(OrderStore::new(dir).list().unwrap().len(), 1);
}

#[test]
fn store_deleted_after_resolution_reads_as_empty() {
    let tmp = TempDir::new().unwrap();
    let dir = StoreLocator::with_override(tmp.path().join("orders"))
        .resolve()
        .unwrap();
    let store = OrderStore::new(&dir);
    write_order(&dir, "1", json!({"drinkType": "latte"}));
    assert_eq!(store.count().unwrap(), 1);

    fs::remove_dir_all(&dir).unwrap();

    assert!(!store.exists());
    assert!(store.list().unwrap().is_empty());
    assert_eq!(store.stats().unwrap().total_orders, 0);
    assert!(matches!(
        store.get("1"),
        Err(StoreError::NotFound { .. })
    ));
}

#[test]
fn one_corrupt_file_among_many() {
    let tmp = TempDir::new().unwrap();
    for i in 0..5 {
        write_order(tmp.path(), &i.to_string(), json!({"size": "medium"}));
    }
    fs::write(tmp.path().join("order_corrupt.json"), "{\"order\": {").unwrap();

    let store = OrderStore::new(tmp.path());

    assert_eq!(store.list().unwrap().len(), 5);
    let stats = store.stats().unwrap();
    assert_eq!(stats.total_orders, 6);
    assert_eq!(stats.sizes.get("medium"), Some(&5));
}

#[tokio::test]
async fn full_api_over_writer_records() {
    let tmp = TempDir::new().unwrap();
    write_order(
        tmp.path(),
        "20250101_093000_000_Sam",
        json!({"drinkType": "latte", "size": "medium", "milk": "oat milk",
               "extras": ["whipped cream"], "name": "Sam"}),
    );
    write_order(
        tmp.path(),
        "20250101_094512_331_Ana",
        json!({"drinkType": "latte", "size": "large", "milk": "whole milk",
               "extras": ["whipped cream", "extra shot"], "name": "Ana"}),
    );
    fs::write(tmp.path().join("order_20250101_100000_000_Bad.html"), "<p/>").unwrap();

    let (status, body) = get_json(OrderStore::new(tmp.path()), "/api/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, body) = get_json(
        OrderStore::new(tmp.path()),
        "/api/orders/20250101_094512_331_Ana",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["order"]["name"], "Ana");

    let (status, body) = get_json(OrderStore::new(tmp.path()), "/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["stats"],
        json!({
            "totalOrders": 2,
            "drinks": {"latte": 2},
            "sizes": {"medium": 1, "large": 1},
            "milks": {"oat milk": 1, "whole milk": 1},
            "extras": {"whipped cream": 2, "extra shot": 1}
        })
    );
}

#[tokio::test]
async fn health_for_missing_directory() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("not-yet");

    let (status, body) = get_json(OrderStore::new(&missing), "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], false);
    assert_eq!(body["orderCount"], 0);
}

#[test]
fn orders_dir_from_environment_overrides_the_search_order() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("from-env");
    std::env::set_var("ORDERS_DIR", &dir);

    let config = Config::load().unwrap();
    std::env::remove_var("ORDERS_DIR");

    assert_eq!(config.orders_dir.as_deref(), Some(dir.as_path()));
    assert!(config.validate().is_ok());
    assert_eq!(
        config.store_locator().candidates(),
        &[Candidate::Explicit(dir.clone())]
    );

    let resolved = config.store_locator().resolve().unwrap();
    assert_eq!(resolved, dir);
    assert!(dir.is_dir());

    write_order(&dir, "env", json!({"drinkType": "mocha"}));
    let store = OrderStore::new(resolved);
    assert_eq!(store.list().unwrap().len(), 1);
    assert_eq!(store.get("env").unwrap()["order"]["drinkType"], "mocha");
}
