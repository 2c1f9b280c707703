//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{
    get_order, list_orders, liveness, order_stats, prometheus_metrics, store_health, AppState,
};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(liveness))
        .route("/api/health", get(store_health))
        // Order endpoints
        .route("/api/orders", get(list_orders))
        .route("/api/orders/:id", get(get_order))
        .route("/api/stats", get(order_stats))
        .route("/metrics", get(prometheus_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{order_file_name, OrderStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn app_with_orders(orders: &[(&str, &str)]) -> (TempDir, Router) {
        let tmp = TempDir::new().unwrap();
        for (id, contents) in orders {
            fs::write(tmp.path().join(order_file_name(id)), contents).unwrap();
        }
        let app = create_router(AppState::new(OrderStore::new(tmp.path())));
        (tmp, app)
    }

    #[tokio::test]
    async fn liveness_endpoint_returns_ok() {
        let (_tmp, app) = app_with_orders(&[]);

        let (status, body) = get_json(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn list_wraps_orders_in_envelope() {
        let (_tmp, app) = app_with_orders(&[
            ("1", r#"{"order":{"drinkType":"latte"}}"#),
            ("2", "corrupt"),
        ]);

        let (status, body) = get_json(app, "/api/orders").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "orders": [{"order": {"drinkType": "latte"}}],
                "count": 1
            })
        );
    }

    #[tokio::test]
    async fn get_missing_order_is_404() {
        let (_tmp, app) = app_with_orders(&[]);

        let (status, body) = get_json(app, "/api/orders/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "error": "Order not found"}));
    }

    #[tokio::test]
    async fn get_encoded_traversal_is_404() {
        let (_tmp, app) = app_with_orders(&[]);

        let (status, _) = get_json(app, "/api/orders/..%2Fsecret").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_existing_order_returns_it() {
        let (_tmp, app) = app_with_orders(&[("abc", r#"{"order":{"size":"small"}}"#)]);

        let (status, body) = get_json(app, "/api/orders/abc").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "order": {"order": {"size": "small"}}})
        );
    }

    #[tokio::test]
    async fn get_corrupt_order_is_500() {
        let (_tmp, app) = app_with_orders(&[("bad", "{")]);

        let (status, body) = get_json(app, "/api/orders/bad").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn stats_envelope_matches_wire_shape() {
        let (_tmp, app) = app_with_orders(&[
            ("1", r#"{"order":{"drinkType":"latte","milk":"oat"}}"#),
            ("2", r#"{"order":{"drinkType":"latte","extras":["foam"]}}"#),
            ("3", "nope"),
        ]);

        let (status, body) = get_json(app, "/api/stats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "stats": {
                    "totalOrders": 3,
                    "drinks": {"latte": 2},
                    "sizes": {},
                    "milks": {"oat": 1},
                    "extras": {"foam": 1}
                }
            })
        );
    }

    #[tokio::test]
    async fn health_reports_directory_state() {
        let (tmp, app) = app_with_orders(&[("1", "{}"), ("2", "broken")]);

        let (status, body) = get_json(app, "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["exists"], true);
        assert_eq!(body["orderCount"], 2);
        assert_eq!(body["ordersDir"], tmp.path().display().to_string());
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn metrics_endpoint_is_404_without_recorder() {
        let (_tmp, app) = app_with_orders(&[]);

        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
