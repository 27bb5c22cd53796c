use std::time::Duration;

use brief_core::SourceRecords;
use brief_core::model::fields;
use brief_core::records::RawRecord;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::config::DatabaseIds;

pub const NOTION_API_VERSION: &str = "2022-06-28";
pub const NOTION_BASE_URL: &str = "https://api.notion.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE_SIZE: u32 = 100;
/// Upper bound on followed cursors per query.
const MAX_PAGES: usize = 50;

#[derive(Debug, Error)]
pub enum NotionError {
    #[error("Notion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Notion API error: {status} - {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

/// Thin client over the Notion database query endpoint.
#[derive(Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

impl NotionClient {
    pub fn new(token: &str) -> Self {
        Self::with_timeout(token, REQUEST_TIMEOUT)
    }

    /// Panics when the HTTP client cannot be built, which only happens at
    /// startup when the TLS backend fails to initialize.
    pub fn with_timeout(token: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build Notion HTTP client");
        Self {
            http,
            token: token.to_string(),
            base_url: NOTION_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Query a database, following `next_cursor` until the last page.
    pub async fn query_database(
        &self,
        database_id: &str,
        filter: Option<Value>,
        sorts: Option<Value>,
    ) -> Result<Vec<Value>, NotionError> {
        let url = format!("{}/databases/{}/query", self.base_url, database_id);
        let mut results = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let body = query_body(filter.as_ref(), sorts.as_ref(), cursor.as_deref());
            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.token)
                .header("Notion-Version", NOTION_API_VERSION)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(NotionError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let page: QueryResponse = response.json().await?;
            results.extend(page.results);
            match (page.has_more, page.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => return Ok(results),
            }
        }

        tracing::warn!(
            database_id,
            pages = MAX_PAGES,
            "stopped following Notion cursors"
        );
        Ok(results)
    }

    pub async fn query_by_date(
        &self,
        database_id: &str,
        property: &str,
        date: &str,
    ) -> Result<Vec<Value>, NotionError> {
        let filter = json!({ "property": property, "date": { "equals": date } });
        self.query_database(database_id, Some(filter), None).await
    }

    /// Unresolved mistakes, newest first.
    pub async fn query_unresolved_mistakes(
        &self,
        database_id: &str,
    ) -> Result<Vec<Value>, NotionError> {
        let filter = json!({ "property": fields::mistake::RESOLVED, "checkbox": { "equals": false } });
        let sorts = json!([{ "timestamp": "created_time", "direction": "descending" }]);
        self.query_database(database_id, Some(filter), Some(sorts))
            .await
    }

    /// Plan entries dated `run_date`.
    pub async fn fetch_plan(
        &self,
        databases: &DatabaseIds,
        run_date: &str,
    ) -> Result<Vec<RawRecord>, NotionError> {
        let plan = self
            .query_by_date(&databases.plan, fields::plan::DATE, run_date)
            .await?;
        tracing::debug!(run_date, plan = plan.len(), "fetched Notion plan");
        Ok(page_records(plan))
    }

    /// The remaining four sources for `run_date`, queried concurrently and
    /// combined with the already fetched `plan`.
    pub async fn fetch_sources(
        &self,
        databases: &DatabaseIds,
        run_date: &str,
        plan: Vec<RawRecord>,
    ) -> Result<SourceRecords, NotionError> {
        let (objectives, resources, practice_tests, mistakes) = tokio::try_join!(
            self.query_database(&databases.objectives, None, None),
            self.query_database(&databases.resources, None, None),
            self.query_by_date(&databases.practice_tests, fields::practice_test::DATE, run_date),
            self.query_unresolved_mistakes(&databases.mistakes),
        )?;

        tracing::debug!(
            run_date,
            objectives = objectives.len(),
            resources = resources.len(),
            practice_tests = practice_tests.len(),
            mistakes = mistakes.len(),
            "fetched Notion sources"
        );

        Ok(SourceRecords {
            plan,
            objectives: page_records(objectives),
            resources: page_records(resources),
            practice_tests: page_records(practice_tests),
            mistakes: page_records(mistakes),
        })
    }
}

fn query_body(filter: Option<&Value>, sorts: Option<&Value>, cursor: Option<&str>) -> Value {
    let mut body = json!({ "page_size": PAGE_SIZE });
    if let Some(filter) = filter {
        body["filter"] = filter.clone();
    }
    if let Some(sorts) = sorts {
        body["sorts"] = sorts.clone();
    }
    if let Some(cursor) = cursor {
        body["start_cursor"] = json!(cursor);
    }
    body
}

/// A Notion page's `properties` object is the raw record.
fn page_records(pages: Vec<Value>) -> Vec<RawRecord> {
    pages
        .into_iter()
        .map(|mut page| {
            page.get_mut("properties")
                .map(Value::take)
                .map(RawRecord::from)
                .unwrap_or_default()
        })
        .collect()
}
