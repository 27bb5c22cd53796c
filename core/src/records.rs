use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A loosely-typed source record, keyed by field (property) name.
///
/// Field values are either plain JSON scalars or Notion property objects
/// (`{"type": "rich_text", "rich_text": [...]}` and friends). Accessors never
/// fail: an absent or unrecognised value yields the field's default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(pub Map<String, Value>);

impl RawRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Trimmed text of a field, empty when absent.
    pub fn text(&self, field: &str) -> String {
        self.get(field).map(value_text).unwrap_or_default()
    }

    /// Boolean of a field, `false` when absent.
    pub fn flag(&self, field: &str) -> bool {
        self.get(field).is_some_and(value_flag)
    }

    /// Calendar date of a field, `None` when absent or unparsable.
    pub fn date(&self, field: &str) -> Option<NaiveDate> {
        parse_record_date(&self.text(field))
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Build a record from a JSON value. Non-objects become an empty record.
impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

/// Record dates are `YYYY-MM-DD`, optionally followed by a time part
/// (`2025-01-02T09:00:00.000-05:00`).
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10)?;
    match raw[10..].chars().next() {
        None | Some('T') | Some(' ') => {}
        Some(_) => return None,
    }
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => rich_text(items),
        Value::Object(obj) => property_text(obj),
    }
}

/// Concatenate the `plain_text` of a rich-text array.
fn rich_text(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.as_str(),
            other => other
                .get("plain_text")
                .and_then(Value::as_str)
                .unwrap_or(""),
        })
        .collect::<String>()
        .trim()
        .to_string()
}

fn property_text(obj: &Map<String, Value>) -> String {
    let kind = obj.get("type").and_then(Value::as_str).unwrap_or("");
    let inner = obj.get(kind);

    match kind {
        "title" | "rich_text" => inner
            .and_then(Value::as_array)
            .map(|items| rich_text(items))
            .unwrap_or_default(),
        "select" | "status" => inner
            .and_then(|option| option.get("name"))
            .and_then(Value::as_str)
            .map(|name| name.trim().to_string())
            .unwrap_or_default(),
        "multi_select" => inner
            .and_then(Value::as_array)
            .map(|options| {
                options
                    .iter()
                    .filter_map(|option| option.get("name").and_then(Value::as_str))
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default(),
        "date" => inner
            .and_then(|date| date.get("start"))
            .and_then(Value::as_str)
            .map(|start| start.trim().to_string())
            .unwrap_or_default(),
        "formula" => inner
            .and_then(Value::as_object)
            .map(property_text)
            .unwrap_or_default(),
        "url" | "email" | "phone_number" | "string" | "number" | "checkbox" | "boolean" => {
            inner.map(value_text).unwrap_or_default()
        }
        // Untyped property: fall back to whichever text-bearing key is present.
        _ => ["rich_text", "title", "plain_text", "name", "url"]
            .iter()
            .find_map(|key| obj.get(*key))
            .map(value_text)
            .unwrap_or_default(),
    }
}

fn value_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes"),
        Value::Object(obj) => {
            let kind = obj.get("type").and_then(Value::as_str).unwrap_or("checkbox");
            match kind {
                "formula" => obj.get("formula").is_some_and(value_flag),
                _ => obj.get(kind).is_some_and(value_flag),
            }
        }
        _ => false,
    }
}
