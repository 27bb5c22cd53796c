use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use brief_core::calendar::{self, DEFAULT_TIMEZONE};
use brief_core::error::ApiError;
use brief_core::{DecisionResult, check_suppression, compose};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::WebhookCaller;
use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(generate_study_email))
}

/// Request body for POST /webhook
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct WebhookRequest {
    /// Date in YYYY-MM-DD format. Defaults to today in `timezone`.
    #[serde(default)]
    pub run_date: Option<String>,
    /// IANA timezone used when `run_date` is omitted
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

/// Compose the daily study email
///
/// Pulls the plan, objectives, resources, practice tests and open mistakes
/// from Notion and decides whether a brief should go out for the run date.
/// `should_send = false` comes with reason `no_plan` or `completed`.
#[utoipa::path(
    post,
    path = "/webhook",
    request_body = WebhookRequest,
    responses(
        (status = 200, description = "Send decision with composed email", body = DecisionResult),
        (status = 400, description = "Malformed run date, timezone or body", body = ApiError),
        (status = 401, description = "Missing or wrong X-AUTH-TOKEN", body = ApiError),
        (status = 500, description = "Server misconfigured", body = ApiError),
        (status = 502, description = "Notion request failed", body = ApiError)
    ),
    security(("webhook_token" = [])),
    tag = "webhook"
)]
pub async fn generate_study_email(
    State(state): State<AppState>,
    _caller: WebhookCaller,
    AppJson(request): AppJson<WebhookRequest>,
) -> Result<Json<DecisionResult>, AppError> {
    state.config.ensure_notion_configured()?;

    let run_date =
        calendar::resolve_run_date(request.run_date.as_deref(), &request.timezone, Utc::now())?;
    let databases = &state.config.databases;
    let plan = state.notion.fetch_plan(databases, &run_date).await?;
    if let Some(result) = check_suppression(&run_date, &plan)? {
        tracing::info!(run_date = %run_date, reason = ?result.reason, "study brief suppressed");
        return Ok(Json(result));
    }

    let sources = state.notion.fetch_sources(databases, &run_date, plan).await?;
    let result = compose(&run_date, &sources, &state.config.brief)?;

    tracing::info!(
        run_date = %run_date,
        should_send = result.should_send,
        reason = ?result.reason,
        objectives = result.debug.objectives_count,
        resources = result.debug.resources_count,
        mistakes = result.debug.mistakes_found,
        "study brief decision"
    );

    Ok(Json(result))
}
