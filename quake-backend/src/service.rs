//! HTTP surface over the cache manager and query functions.
//!
//! Thin glue: parameter validation, the `meta`/`data` response envelope,
//! and the mapping from core error kinds to status codes. All data flows
//! through [`QuakeManager::get_snapshot`]; no handler touches the network.

use std::fmt::Display;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::module::quake::types::QuakeSnapshot;
use crate::module::quake::{QuakeManager, query};

/// Upper bound on `{count}` path parameters.
const MAX_COUNT: i64 = 50;

const AVAILABLE_ENDPOINTS: [&str; 6] = [
    "/health",
    "/earthquakes",
    "/earthquakes/filter",
    "/earthquakes/top/{count}",
    "/earthquakes/recent/{count}",
    "/earthquakes/stats",
];

#[derive(Clone)]
pub struct AppState {
    manager: Arc<QuakeManager>,
}

impl AppState {
    pub fn new(manager: Arc<QuakeManager>) -> Self {
        Self { manager }
    }
}

pub fn router(state: AppState, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/earthquakes", get(list_earthquakes))
        .route("/earthquakes/filter", get(filter_earthquakes))
        .route("/earthquakes/top/{count}", get(top_earthquakes))
        .route("/earthquakes/recent/{count}", get(recent_earthquakes))
        .route("/earthquakes/stats", get(earthquake_stats))
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app
}

#[derive(Debug, Default, Deserialize)]
struct RefreshQuery {
    #[serde(default)]
    refresh: bool,
}

#[derive(Debug, Default, Deserialize)]
struct FilterQuery {
    min_magnitude: Option<f64>,
    max_magnitude: Option<f64>,
    location: Option<String>,
    #[serde(default)]
    refresh: bool,
}

fn envelope(snapshot: &QuakeSnapshot, count: usize, data: impl Serialize) -> Response {
    let now = Utc::now();
    (
        StatusCode::OK,
        Json(json!({
            "meta": {
                "generated_at": now.to_rfc3339(),
                "cached_at": snapshot.fetched_at.to_rfc3339(),
                "cache_age_seconds": (now - snapshot.fetched_at).num_seconds(),
                "count": count,
            },
            "data": data,
        })),
    )
        .into_response()
}

fn error_response(status: StatusCode, error: &str, message: impl Display) -> Response {
    (
        status,
        Json(json!({
            "error": error,
            "message": message.to_string(),
        })),
    )
        .into_response()
}

fn data_error(err: impl Display) -> Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to retrieve earthquake data",
        err,
    )
}

fn validate_count(count: i64) -> Result<usize, Response> {
    if (1..=MAX_COUNT).contains(&count) {
        Ok(count as usize)
    } else {
        Err(error_response(
            StatusCode::BAD_REQUEST,
            "Invalid count parameter",
            format!("count must be between 1 and {MAX_COUNT}, got {count}"),
        ))
    }
}

async fn health(State(state): State<AppState>) -> Response {
    match state.manager.get_snapshot(false).await {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "record_count": snapshot.records.len(),
                "cached_at": snapshot.fetched_at.to_rfc3339(),
            })),
        )
            .into_response(),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "error": err.to_string(),
            })),
        )
            .into_response(),
    }
}

async fn list_earthquakes(
    State(state): State<AppState>,
    Query(q): Query<RefreshQuery>,
) -> Response {
    match state.manager.get_snapshot(q.refresh).await {
        Ok(snapshot) => envelope(&snapshot, snapshot.records.len(), &snapshot.records),
        Err(err) => data_error(err),
    }
}

async fn filter_earthquakes(
    State(state): State<AppState>,
    Query(q): Query<FilterQuery>,
) -> Response {
    match state.manager.get_snapshot(q.refresh).await {
        Ok(snapshot) => {
            let mut records = query::filter_by_magnitude(
                &snapshot.records,
                q.min_magnitude.unwrap_or(0.0),
                q.max_magnitude,
            );
            if let Some(location) = q.location.as_deref().filter(|s| !s.is_empty()) {
                records = query::filter_by_location(&records, location);
            }
            envelope(&snapshot, records.len(), &records)
        }
        Err(err) => data_error(err),
    }
}

async fn top_earthquakes(State(state): State<AppState>, Path(count): Path<i64>) -> Response {
    let count = match validate_count(count) {
        Ok(count) => count,
        Err(response) => return response,
    };

    match state.manager.get_snapshot(false).await {
        Ok(snapshot) => {
            let records = query::top_by_magnitude(&snapshot.records, count);
            envelope(&snapshot, records.len(), &records)
        }
        Err(err) => data_error(err),
    }
}

async fn recent_earthquakes(State(state): State<AppState>, Path(count): Path<i64>) -> Response {
    let count = match validate_count(count) {
        Ok(count) => count,
        Err(response) => return response,
    };

    match state.manager.get_snapshot(false).await {
        Ok(snapshot) => {
            let records = query::most_recent(&snapshot.records, count);
            envelope(&snapshot, records.len(), &records)
        }
        Err(err) => data_error(err),
    }
}

async fn earthquake_stats(State(state): State<AppState>) -> Response {
    match state.manager.get_snapshot(false).await {
        Ok(snapshot) => match query::compute_stats(&snapshot.records) {
            Ok(stats) => envelope(&snapshot, stats.total_count, &stats),
            Err(err) => data_error(err),
        },
        Err(err) => data_error(err),
    }
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "available_endpoints": AVAILABLE_ENDPOINTS,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuakeError;
    use crate::module::quake::testutil::ScriptedFetcher;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_router(fetcher: ScriptedFetcher) -> Router {
        let manager = Arc::new(QuakeManager::new(Arc::new(fetcher), 300));
        router(AppState::new(manager), true)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn list_wraps_records_in_the_envelope() {
        let (status, body) = get_json(test_router(ScriptedFetcher::ok()), "/earthquakes").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["count"], 3);
        assert!(body["meta"]["cache_age_seconds"].as_i64().unwrap() >= 0);
        assert_eq!(body["data"].as_array().unwrap().len(), 3);
        assert_eq!(body["data"][0]["magnitudeNumeric"], 4.5);
    }

    #[tokio::test]
    async fn count_out_of_range_is_a_validation_error() {
        let (status, body) =
            get_json(test_router(ScriptedFetcher::ok()), "/earthquakes/top/0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid count parameter");

        let (status, _) =
            get_json(test_router(ScriptedFetcher::ok()), "/earthquakes/recent/51").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn filter_combines_magnitude_and_location() {
        let (status, body) = get_json(
            test_router(ScriptedFetcher::ok()),
            "/earthquakes/filter?min_magnitude=4.0&location=batangas",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["count"], 1);
        assert_eq!(body["data"][0]["magnitude"], "4.5");
    }

    #[tokio::test]
    async fn stats_endpoint_reports_aggregates() {
        let (status, body) =
            get_json(test_router(ScriptedFetcher::ok()), "/earthquakes/stats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total_count"], 3);
        assert_eq!(body["data"]["magnitude"]["max"], 5.8);
        assert_eq!(body["data"]["strongest"]["magnitude"], "5.8");
    }

    #[tokio::test]
    async fn unknown_route_lists_available_endpoints() {
        let (status, body) = get_json(test_router(ScriptedFetcher::ok()), "/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(
            body["available_endpoints"]
                .as_array()
                .unwrap()
                .iter()
                .any(|e| e == "/earthquakes/stats")
        );
    }

    #[tokio::test]
    async fn health_reflects_fetch_outcome() {
        let (status, body) = get_json(test_router(ScriptedFetcher::ok()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["record_count"], 3);

        let (status, body) = get_json(test_router(ScriptedFetcher::failing()), "/health").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unhealthy");
    }

    #[tokio::test]
    async fn data_endpoint_failure_is_a_500_with_detail() {
        let (status, body) =
            get_json(test_router(ScriptedFetcher::failing()), "/earthquakes").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to retrieve earthquake data");
        assert!(body["message"].as_str().unwrap().contains("unavailable"));
    }

    #[tokio::test]
    async fn failing_refresh_after_success_still_serves_data() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(crate::module::quake::testutil::FIXTURE_HTML.to_string()),
            Err(QuakeError::Network("connection refused".to_string())),
        ]);
        // TTL 0 so the second request always attempts a refresh
        let manager = Arc::new(QuakeManager::new(Arc::new(fetcher), 0));
        let app = router(AppState::new(manager), false);

        let (status, _) = get_json(app.clone(), "/earthquakes").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get_json(app, "/earthquakes").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["count"], 3);
    }
}
