//! Health endpoint.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{ApiResponse, AppState, HealthResponse};

/// Reports whether the database answers a ping.
///
/// # Endpoint
/// `GET /api/v1/health`
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    if let Err(e) = state.store().ping().await {
        tracing::error!(error = %e, "Health check failed");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::<()>::error("database unavailable")),
        )
            .into_response();
    }

    Json(ApiResponse::success(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    }))
    .into_response()
}
