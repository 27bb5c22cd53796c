//! In-process stand-in for the Notion query endpoint.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use brief_core::records::{RawRecord, parse_record_date};
use serde_json::{Value, json};

pub fn page(properties: Value) -> Value {
    json!({ "object": "page", "properties": properties })
}

#[derive(Default)]
pub struct FakeNotionBuilder {
    databases: HashMap<String, Vec<Value>>,
    delay: Duration,
}

struct FakeState {
    databases: HashMap<String, Vec<Value>>,
    delay: Duration,
}

impl FakeNotionBuilder {
    /// Register a database whose pages carry the given properties, in order.
    pub fn database(mut self, id: &str, properties: Vec<Value>) -> Self {
        self.databases
            .insert(id.to_string(), properties.into_iter().map(page).collect());
        self
    }

    /// Hold every response back by `delay`.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn start(self) -> FakeNotion {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("fake notion should bind");
        let addr = listener.local_addr().expect("fake notion addr");
        let app = Router::new()
            .route("/databases/{id}/query", post(query))
            .with_state(Arc::new(FakeState {
                databases: self.databases,
                delay: self.delay,
            }));
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake notion should serve");
        });
        FakeNotion {
            base_url: format!("http://{addr}"),
        }
    }
}

pub struct FakeNotion {
    pub base_url: String,
}

impl FakeNotion {
    pub fn builder() -> FakeNotionBuilder {
        FakeNotionBuilder::default()
    }
}

async fn query(
    State(fake): State<Arc<FakeState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !fake.delay.is_zero() {
        tokio::time::sleep(fake.delay).await;
    }
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !token.trim().is_empty());
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "code": "unauthorized" }))).into_response();
    }
    let Some(pages) = fake.databases.get(&id) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "code": "object_not_found" }))).into_response();
    };

    let matching: Vec<&Value> = pages
        .iter()
        .filter(|page| matches_filter(page, body.get("filter")))
        .collect();

    let page_size = body["page_size"].as_u64().unwrap_or(100) as usize;
    let start = body["start_cursor"]
        .as_str()
        .and_then(|c| c.parse::<usize>().ok())
        .unwrap_or(0)
        .min(matching.len());
    let end = (start + page_size).min(matching.len());
    let has_more = end < matching.len();

    Json(json!({
        "object": "list",
        "results": &matching[start..end],
        "has_more": has_more,
        "next_cursor": has_more.then(|| end.to_string()),
    }))
    .into_response()
}

fn matches_filter(page: &Value, filter: Option<&Value>) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    let property = filter["property"].as_str().unwrap_or_default();
    let record = RawRecord::from(page["properties"].clone());

    if let Some(date) = filter["date"]["equals"].as_str() {
        return record.date(property).is_some() && record.date(property) == parse_record_date(date);
    }
    if let Some(expected) = filter["checkbox"]["equals"].as_bool() {
        return record.flag(property) == expected;
    }
    true
}
