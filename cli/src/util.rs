use serde_json::json;

pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}

pub fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}

pub fn eprint_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => eprintln!("{text}"),
        Err(_) => eprintln!("{value}"),
    }
}

pub fn exit_error(message: &str, docs_hint: Option<&str>) -> ! {
    let mut err = json!({
        "error": "cli_error",
        "message": message
    });
    if let Some(hint) = docs_hint {
        err["docs_hint"] = json!(hint);
    }
    eprint_json(&err);
    std::process::exit(1);
}

/// Send a request to the webhook service and print the JSON response.
///
/// Exit codes: 0 success, 1 client error (4xx), 2 server error (5xx),
/// 3 connection error, 4 bad URL.
pub async fn api_request(
    api_url: &str,
    method: reqwest::Method,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> i32 {
    let url = match reqwest::Url::parse(&format!("{}{path}", api_url.trim_end_matches('/'))) {
        Ok(u) => u,
        Err(e) => {
            eprint_json(&json!({
                "error": "cli_error",
                "message": format!("Invalid URL: {api_url}{path}: {e}")
            }));
            return 4;
        }
    };

    let mut req = client().request(method, url);
    if let Some(t) = token {
        req = req.header("X-AUTH-TOKEN", t);
    }
    if let Some(b) = body {
        req = req.json(&b);
    }

    let resp = match req.send().await {
        Ok(r) => r,
        Err(e) => {
            eprint_json(&json!({
                "error": "connection_error",
                "message": format!("{e}"),
                "docs_hint": "Is the webhook service running? Check BRIEF_API_URL."
            }));
            return 3;
        }
    };

    let status = resp.status().as_u16();
    let exit_code = match status {
        200..=299 => 0,
        400..=499 => 1,
        _ => 2,
    };

    let body: serde_json::Value = match resp.json().await {
        Ok(v) => v,
        Err(e) => json!({ "error": "invalid_response", "message": format!("{e}") }),
    };

    if exit_code == 0 {
        print_json(&body);
    } else {
        eprint_json(&body);
    }
    exit_code
}
