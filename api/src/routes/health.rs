use axum::{Json, Router, routing::get};

use crate::HealthResponse;
use crate::state::AppState;

pub const SERVICE_NAME: &str = "md102-study-webhook";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(service_status))
        .route("/health", get(health_check))
}

/// Service banner for uptime probes hitting the root path
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is running", body = HealthResponse)),
    tag = "system"
)]
pub async fn service_status() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Health check for hosting platforms
///
/// Does not touch Notion; a misconfigured deployment still reports healthy
/// here and fails on `/webhook` instead.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse)),
    tag = "system"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
