//! JSON extractor that reports body rejections in the `ApiError` envelope.
//!
//! Use `AppJson<T>` in place of `axum::Json<T>` in handler signatures so a
//! malformed webhook body yields a structured 400 instead of axum's plain-text
//! rejection.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::error::AppError;

pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(map_json_rejection(rejection)),
        }
    }
}

pub fn map_json_rejection(rejection: JsonRejection) -> AppError {
    let body_text = rejection.body_text();
    let field = field_from_serde_message(&body_text).unwrap_or_else(|| "body".to_string());

    AppError::Validation {
        message: format!("Invalid request body: {body_text}"),
        field: Some(field),
        received: None,
        docs_hint: Some(
            "Expected {\"run_date\": \"YYYY-MM-DD\", \"timezone\": \"America/New_York\"} with Content-Type: application/json."
                .to_string(),
        ),
    }
}

/// Pull the field name out of serde messages such as
/// "missing field `run_date`" or "unknown field `foo`".
fn field_from_serde_message(msg: &str) -> Option<String> {
    ["missing field `", "unknown field `"].iter().find_map(|pattern| {
        let start = msg.find(pattern)? + pattern.len();
        let rest = &msg[start..];
        rest.find('`').map(|end| rest[..end].to_string())
    })
}
