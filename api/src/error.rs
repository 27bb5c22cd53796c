use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use brief_core::BriefError;
use brief_core::error::{self, ApiError};

use crate::notion::NotionError;

/// Internal error type that converts to structured API responses
#[derive(Debug)]
pub enum AppError {
    /// Validation error (400)
    Validation {
        message: String,
        field: Option<String>,
        received: Option<serde_json::Value>,
        docs_hint: Option<String>,
    },
    /// Missing or wrong shared secret (401)
    Unauthorized { message: String },
    /// Required settings are absent (500)
    Misconfigured { message: String },
    /// Notion returned an error or could not be reached (502)
    Upstream(NotionError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = uuid::Uuid::now_v7().to_string();

        let (status, api_error) = match self {
            AppError::Validation {
                message,
                field,
                received,
                docs_hint,
            } => (
                StatusCode::BAD_REQUEST,
                ApiError {
                    error: error::codes::VALIDATION_FAILED.to_string(),
                    message,
                    field,
                    received,
                    request_id,
                    docs_hint,
                },
            ),
            AppError::Unauthorized { message } => {
                tracing::warn!(request_id = %request_id, "webhook call rejected: {}", message);
                (
                    StatusCode::UNAUTHORIZED,
                    ApiError {
                        error: error::codes::UNAUTHORIZED.to_string(),
                        message,
                        field: Some("X-AUTH-TOKEN".to_string()),
                        received: None,
                        request_id,
                        docs_hint: Some(
                            "Send the shared secret configured as AUTH_TOKEN in the X-AUTH-TOKEN header."
                                .to_string(),
                        ),
                    },
                )
            }
            AppError::Misconfigured { message } => {
                tracing::error!("Server misconfigured: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError {
                        error: error::codes::MISCONFIGURED.to_string(),
                        message: format!("Server misconfigured: {message}"),
                        field: None,
                        received: None,
                        request_id,
                        docs_hint: None,
                    },
                )
            }
            AppError::Upstream(err) => {
                tracing::error!("Notion error: {}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    ApiError {
                        error: error::codes::UPSTREAM_ERROR.to_string(),
                        message: err.to_string(),
                        field: None,
                        received: None,
                        request_id,
                        docs_hint: Some(
                            "Check that NOTION_TOKEN is valid and every database is shared with the integration."
                                .to_string(),
                        ),
                    },
                )
            }
        };

        (status, Json(api_error)).into_response()
    }
}

impl From<NotionError> for AppError {
    fn from(err: NotionError) -> Self {
        AppError::Upstream(err)
    }
}

impl From<BriefError> for AppError {
    fn from(err: BriefError) -> Self {
        let received = match &err {
            BriefError::InvalidDate(raw) | BriefError::UnknownTimezone(raw) => {
                serde_json::Value::String(raw.clone())
            }
        };
        AppError::Validation {
            message: err.to_string(),
            field: Some(err.field().to_string()),
            received: Some(received),
            docs_hint: Some(
                "Send {\"run_date\": \"YYYY-MM-DD\"} or omit run_date to use today in the given timezone."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        serde_json::from_slice(&bytes).expect("body should be json")
    }

    #[tokio::test]
    async fn invalid_date_maps_to_validation_envelope() {
        let response =
            AppError::from(BriefError::InvalidDate("2025-13-01".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_failed");
        assert_eq!(body["field"], "run_date");
        assert_eq!(body["received"], "2025-13-01");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn unauthorized_maps_to_401() {
        let response = AppError::Unauthorized {
            message: "Invalid or missing X-AUTH-TOKEN".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "unauthorized");
    }

    #[tokio::test]
    async fn upstream_maps_to_bad_gateway() {
        let response = AppError::Upstream(NotionError::Status {
            status: 404,
            body: "object_not_found".into(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Notion API error: 404 - object_not_found");
    }
}
