//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{error, info, warn};

use crate::error::StoreError;
use crate::metrics::LatencyTimer;
use crate::store::{OrderStats, OrderStore};

/// Message returned when a requested order does not exist.
pub const ORDER_NOT_FOUND: &str = "Order not found";

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The order store, resolved once at startup.
    pub store: Arc<OrderStore>,
    /// Prometheus handle, when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(store: OrderStore) -> Self {
        Self {
            store: Arc::new(store),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Run a store operation on the blocking pool.
    async fn with_store<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&OrderStore) -> Result<T, StoreError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| ApiError::internal(format!("store task failed: {e}")))?
            .map_err(ApiError::from)
    }
}

/// Failure envelope: `{success:false, error}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always false.
    pub success: bool,
    /// Human-readable message.
    pub error: String,
}

/// Handler error mapped onto a status code and the failure envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// 404 for a missing order.
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: ORDER_NOT_FOUND.to_string(),
        }
    }

    /// 500 with the given message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    /// Status code for this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if err.is_not_found() {
            return Self::not_found();
        }
        error!("Store request failed: {}", err);
        Self::internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// `GET /api/orders` response.
#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    /// Always true.
    pub success: bool,
    /// Parsed records.
    pub orders: Vec<Value>,
    /// Number of records returned.
    pub count: usize,
}

/// `GET /api/orders/:id` response.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    /// Always true.
    pub success: bool,
    /// The parsed record.
    pub order: Value,
}

/// `GET /api/stats` response.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Always true.
    pub success: bool,
    /// Aggregate statistics.
    pub stats: OrderStats,
}

/// `GET /api/health` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always true.
    pub success: bool,
    /// Resolved store directory.
    pub orders_dir: String,
    /// Whether the directory currently exists.
    pub exists: bool,
    /// Number of files matching the order naming pattern.
    pub order_count: usize,
    /// Report time, RFC 3339 UTC.
    pub timestamp: String,
}

/// Liveness handler - always returns 200.
pub async fn liveness() -> impl IntoResponse {
    Json(LivenessResponse { status: "ok" })
}

/// List every readable order.
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<OrdersResponse>, ApiError> {
    let _timer = LatencyTimer::new("list_orders");
    let orders = state.with_store(|store| store.list()).await?;
    info!(count = orders.len(), "Listed orders");

    Ok(Json(OrdersResponse {
        success: true,
        count: orders.len(),
        orders,
    }))
}

/// Fetch a single order by id.
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let _timer = LatencyTimer::new("get_order");
    let lookup = id.clone();
    let order = state
        .with_store(move |store| store.get(&lookup))
        .await
        .inspect_err(|e| {
            if e.status() == StatusCode::NOT_FOUND {
                info!(order_id = %id, "Order not found");
            }
        })?;

    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}

/// Aggregate statistics over all orders.
pub async fn order_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let _timer = LatencyTimer::new("order_stats");
    let stats = state.with_store(|store| store.stats()).await?;
    info!(total_orders = stats.total_orders, "Computed order stats");

    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}

/// Store health report. Never fails.
pub async fn store_health(State(state): State<AppState>) -> impl IntoResponse {
    let _timer = LatencyTimer::new("store_health");
    let store = Arc::clone(&state.store);

    let (exists, order_count) = tokio::task::spawn_blocking(move || {
        let exists = store.exists();
        let count = store.count().unwrap_or_else(|e| {
            warn!("Failed to count orders for health report: {}", e);
            0
        });
        (exists, count)
    })
    .await
    .unwrap_or_else(|e| {
        warn!("Health task failed: {}", e);
        (false, 0)
    });

    Json(HealthResponse {
        success: true,
        orders_dir: state.store.dir().display().to_string(),
        exists,
        order_count,
        timestamp: now_rfc3339(),
    })
}

/// Prometheus exposition; 404 when no recorder is installed.
pub async fn prometheus_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::now_utc().unix_timestamp().to_string())
}
