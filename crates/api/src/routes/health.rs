//! Liveness and readiness probes.

use axum::{Json, extract::State, http::StatusCode};

use mindwhiz_core::HealthResponse;

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Reports that the process is serving. Does not check dependencies.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
    })
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
