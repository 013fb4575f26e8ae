//! Item endpoint handlers.

use std::time::Duration;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use rand::Rng;
use serde_json::json;

use crate::api::types::{CacheParams, ErrorParams, Item, ItemCreate, ListParams, SlowParams};
use crate::error::{ApiError, ErrorResponse};
use crate::http::middleware::CorrelationId;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Maximum delay honored by the slow endpoint, in seconds.
const MAX_SLOW_DELAY_SECS: u64 = 30;

/// Simulated datastore read latency.
const STORE_READ_LATENCY: Duration = Duration::from_millis(10);

/// Simulated datastore write latency.
const STORE_WRITE_LATENCY: Duration = Duration::from_millis(20);

/// Router for the item endpoints, nested under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{item_id}", get(get_item))
        .route("/slow", get(slow))
        .route("/error", get(fail))
        .route("/cache-test", get(cache_test))
}

/// List items with pagination.
async fn list_items(
    Extension(correlation_id): Extension<CorrelationId>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Item>> {
    tracing::info!(
        correlation_id = %correlation_id,
        skip = params.skip,
        limit = params.limit,
        "Fetching items"
    );

    tokio::time::sleep(STORE_READ_LATENCY).await;

    let end = params.skip.saturating_add(params.limit);
    let mut rng = rand::thread_rng();
    let items: Vec<Item> = (params.skip..end)
        .map(|i| Item {
            id: i as i64,
            name: format!("Item {i}"),
            description: Some(format!("Description for item {i}")),
            price: round_price(rng.gen_range(10.0..1000.0)),
            available: rng.gen_bool(0.5),
        })
        .collect();

    metrics::record_items_processed("get_items", "success", items.len() as u64);
    Json(items)
}

/// Fetch a single item by ID.
///
/// Negative IDs are a client error; ID 999 simulates a missing entity.
async fn get_item(
    Extension(correlation_id): Extension<CorrelationId>,
    Path(item_id): Path<i64>,
) -> Result<Json<Item>, ApiError> {
    tracing::info!(correlation_id = %correlation_id, item_id, "Fetching item");

    if item_id < 0 {
        tracing::warn!(correlation_id = %correlation_id, item_id, "Invalid item ID requested");
        metrics::record_error("validation_error", "warning");
        return Err(
            ApiError::validation("Item ID must be non-negative").with_correlation(&correlation_id)
        );
    }

    if item_id == 999 {
        tracing::error!(correlation_id = %correlation_id, item_id, "Item not found");
        metrics::record_error("not_found", "info");
        return Err(
            ApiError::not_found(format!("Item {item_id} not found"))
                .with_correlation(&correlation_id),
        );
    }

    tokio::time::sleep(STORE_READ_LATENCY).await;

    let item = Item {
        id: item_id,
        name: format!("Item {item_id}"),
        description: Some(format!("Description for item {item_id}")),
        price: round_price(rand::thread_rng().gen_range(10.0..1000.0)),
        available: true,
    };

    metrics::record_items_processed("get_item", "success", 1);
    Ok(Json(item))
}

/// Create a new item.
async fn create_item(
    Extension(correlation_id): Extension<CorrelationId>,
    Json(payload): Json<ItemCreate>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    tracing::info!(
        correlation_id = %correlation_id,
        item_name = %payload.name,
        "Creating item"
    );

    if let Err(message) = payload.validate() {
        tracing::warn!(correlation_id = %correlation_id, reason = %message, "Invalid item payload");
        metrics::record_error("validation_error", "warning");
        return Err(ApiError::validation(message).with_correlation(&correlation_id));
    }

    tokio::time::sleep(STORE_WRITE_LATENCY).await;

    let item = Item {
        id: rand::thread_rng().gen_range(1000..=9999),
        name: payload.name,
        description: payload.description,
        price: payload.price,
        available: true,
    };

    metrics::record_items_processed("create_item", "success", 1);
    tracing::info!(correlation_id = %correlation_id, item_id = item.id, "Item created");

    Ok((StatusCode::CREATED, Json(item)))
}

/// Intentionally slow endpoint for timeout and monitoring drills.
async fn slow(Query(params): Query<SlowParams>) -> Json<serde_json::Value> {
    let delay = params.delay.min(MAX_SLOW_DELAY_SECS);
    tokio::time::sleep(Duration::from_secs(delay)).await;
    Json(json!({ "message": format!("Completed after {delay} seconds") }))
}

/// Returns the requested error status, for exercising the error paths.
/// `error_type=panic` raises an unhandled fault to drill the catch-panic
/// boundary and the pipeline's failure accounting.
async fn fail(
    Extension(correlation_id): Extension<CorrelationId>,
    Query(params): Query<ErrorParams>,
) -> Response {
    if params.error_type == "panic" {
        panic!("Simulated handler panic");
    }

    let (status, detail) = match params.error_type.as_str() {
        "400" => (StatusCode::BAD_REQUEST, "Bad Request"),
        "401" => (StatusCode::UNAUTHORIZED, "Unauthorized"),
        "403" => (StatusCode::FORBIDDEN, "Forbidden"),
        "404" => (StatusCode::NOT_FOUND, "Not Found"),
        "503" => (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
    };

    metrics::record_error(&format!("http_{}", status.as_u16()), "error");

    let body = ErrorResponse {
        error: format!("http_{}", status.as_u16()),
        message: detail.to_string(),
        correlation_id: Some(correlation_id.as_str().to_string()),
    };
    (status, Json(body)).into_response()
}

/// Exercises the cache hit/miss counters with a coin flip.
async fn cache_test(Query(params): Query<CacheParams>) -> Json<serde_json::Value> {
    let cache_name = "test_cache";

    if params.use_cache && rand::thread_rng().gen_bool(0.5) {
        metrics::record_cache_hit(cache_name);
        Json(json!({ "source": "cache", "data": "cached_data" }))
    } else {
        metrics::record_cache_miss(cache_name);
        tokio::time::sleep(Duration::from_millis(100)).await;
        Json(json!({ "source": "database", "data": "fresh_data" }))
    }
}

fn round_price(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}
