use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Failures of the engine itself. Missing fields and unmatched ids are never
/// errors; only malformed required input ends up here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BriefError {
    #[error("invalid run date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("unknown timezone '{0}': expected an IANA name such as America/New_York")]
    UnknownTimezone(String),
}

impl BriefError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            BriefError::InvalidDate(_) => "run_date",
            BriefError::UnknownTimezone(_) => "timezone",
        }
    }
}

/// Structured error response returned by the service.
/// Carries enough context for the scheduler calling the webhook to tell a
/// configuration problem from a bad request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    /// Machine-readable error code (e.g. "validation_failed", "unauthorized")
    pub error: String,
    /// Human-readable description of what went wrong
    pub message: String,
    /// Which field caused the error (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// The value that was received (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<serde_json::Value>,
    /// Request ID for tracing and debugging
    pub request_id: String,
    /// Hint about what the correct usage looks like
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_hint: Option<String>,
}

/// Error codes used across the API
pub mod codes {
    pub const VALIDATION_FAILED: &str = "validation_failed";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const MISCONFIGURED: &str = "misconfigured";
    pub const UPSTREAM_ERROR: &str = "upstream_error";
}

#[cfg(test)]
mod tests {
    use super::BriefError;

    #[test]
    fn brief_errors_name_the_offending_field() {
        assert_eq!(BriefError::InvalidDate("x".into()).field(), "run_date");
        assert_eq!(BriefError::UnknownTimezone("x".into()).field(), "timezone");
    }

    #[test]
    fn invalid_date_message_echoes_input() {
        let err = BriefError::InvalidDate("2025-13-40".into());
        assert_eq!(
            err.to_string(),
            "invalid run date '2025-13-40': expected YYYY-MM-DD"
        );
    }
}
