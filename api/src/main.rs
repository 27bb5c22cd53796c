use std::net::SocketAddr;

use axum::Router;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod auth;
mod config;
mod error;
mod extract;
mod notion;
mod routes;
mod state;
#[cfg(test)]
mod testing;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MD-102 Study Email Webhook",
        version = "0.1.0",
        description = "Decides once per day whether a study-reminder email goes out and composes it from five Notion databases."
    ),
    paths(
        routes::health::service_status,
        routes::health::health_check,
        routes::webhook::generate_study_email,
    ),
    components(schemas(
        HealthResponse,
        routes::webhook::WebhookRequest,
        brief_core::error::ApiError,
        brief_core::brief::DecisionResult,
        brief_core::brief::DebugInfo,
        brief_core::brief::Reason,
    )),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "webhook_token",
            utoipa::openapi::security::SecurityScheme::ApiKey(
                utoipa::openapi::security::ApiKey::Header(
                    utoipa::openapi::security::ApiKeyValue::new("X-AUTH-TOKEN"),
                ),
            ),
        );
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

pub fn build_router(app_state: state::AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(routes::health::router())
        .merge(routes::webhook::router())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

#[tokio::main]
async fn main() {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();

    // Structured JSON logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brief_api=debug,brief_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = config::Config::from_env();
    if config.auth_token.is_empty() {
        tracing::warn!("AUTH_TOKEN is not set; /webhook will answer 500 until it is");
    }
    let missing = config.missing_notion_settings();
    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "Notion settings incomplete");
    }

    let port = config.port;
    let app = build_router(state::AppState::new(config));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Study brief webhook listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
