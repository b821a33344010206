//! Handler for health check endpoint.

use axum::{Json, extract::State};

use crate::api::dto::health::HealthResponse;
use crate::state::AppState;

/// Returns service health and registry size.
///
/// # Endpoint
///
/// `GET /health`
///
/// The registry is in memory once loaded, so this never blocks on storage;
/// it only waits for an in-flight create to finish.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "backend": "file",
///   "count": 42
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.registry.backend_name().to_string(),
        count: state.registry.count().await,
    })
}
