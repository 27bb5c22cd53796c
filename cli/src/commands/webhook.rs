use serde_json::json;

use crate::util::{api_request, exit_error};

/// Ask a running service for the decision, exactly as the scheduler would.
pub async fn run(api_url: &str, token: Option<&str>, date: Option<&str>, timezone: &str) -> i32 {
    let Some(token) = token else {
        exit_error(
            "webhook token is required",
            Some("Set --token or BRIEF_AUTH_TOKEN to the service's AUTH_TOKEN"),
        );
    };
    api_request(
        api_url,
        reqwest::Method::POST,
        "/webhook",
        Some(token),
        Some(request_body(date, timezone)),
    )
    .await
}

fn request_body(date: Option<&str>, timezone: &str) -> serde_json::Value {
    let mut body = json!({ "timezone": timezone });
    if let Some(date) = date {
        body["run_date"] = json!(date);
    }
    body
}
