use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use brief_core::auth::{hash_token, tokens_match};

use crate::error::AppError;
use crate::state::AppState;

pub const AUTH_HEADER: &str = "x-auth-token";

/// Proof that the caller presented the shared webhook secret in `X-AUTH-TOKEN`.
#[derive(Debug, Clone, Copy)]
pub struct WebhookCaller;

impl FromRequestParts<AppState> for WebhookCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(
            parts.headers.get(AUTH_HEADER).and_then(|v| v.to_str().ok()),
            &state.config.auth_token,
        )
    }
}

fn authorize(presented: Option<&str>, expected: &str) -> Result<WebhookCaller, AppError> {
    if expected.is_empty() {
        return Err(AppError::Misconfigured {
            message: "AUTH_TOKEN not set".to_string(),
        });
    }
    match presented {
        Some(token) if tokens_match(token, expected) => Ok(WebhookCaller),
        Some(token) => {
            // Digest prefix only, never the secret.
            tracing::warn!(token_fingerprint = &hash_token(token)[..8], "wrong webhook token");
            Err(AppError::Unauthorized {
                message: "Invalid or missing X-AUTH-TOKEN".to_string(),
            })
        }
        None => Err(AppError::Unauthorized {
            message: "Invalid or missing X-AUTH-TOKEN".to_string(),
        }),
    }
}
