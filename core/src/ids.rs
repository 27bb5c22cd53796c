//! Free-text identifier lists ("R04, R51", "P-ENTRA-01..04") as ordered sets.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Ranges wider than this are kept as a literal token.
pub const MAX_RANGE_EXPANSION: u32 = 100;

/// `P-ENTRA-01..04`
static SHORT_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)(\d+)\.\.(\d+)$").expect("valid short range regex"));
/// `P-ENTRA-01..P-ENTRA-04`
static LONG_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)(\d+)\.\.(.+?)(\d+)$").expect("valid long range regex"));

/// Insertion-ordered set of identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdList {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl IdList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split on commas and whitespace, trim, drop empties, expand ranges and
    /// keep the first occurrence of each id. Matching stays case-sensitive.
    pub fn parse(raw: &str) -> Self {
        let mut ids = Self::new();
        for token in raw
            .split(|c: char| c == ',' || c.is_whitespace())
            .map(str::trim)
            .filter(|token| !token.is_empty())
        {
            match expand_range(token) {
                Some(expanded) => {
                    for id in expanded {
                        ids.insert(id);
                    }
                }
                None => {
                    ids.insert(token);
                }
            }
        }
        ids
    }

    /// Returns `false` when the id was already present or is blank.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        let id = id.trim();
        if id.is_empty() || self.seen.contains(id) {
            return false;
        }
        self.seen.insert(id.to_string());
        self.order.push(id.to_string());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id.trim())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

impl<S: Into<String>> FromIterator<S> for IdList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut ids = Self::new();
        for id in iter {
            ids.insert(id);
        }
        ids
    }
}

/// Parse an identifier list into plain, deduplicated, order-preserving ids.
pub fn parse_id_list(raw: &str) -> Vec<String> {
    IdList::parse(raw).into_vec()
}

fn expand_range(token: &str) -> Option<Vec<String>> {
    let (prefix, start, end) = if let Some(caps) = SHORT_RANGE_RE.captures(token) {
        (caps.get(1)?.as_str(), caps.get(2)?.as_str(), caps.get(3)?.as_str())
    } else {
        let caps = LONG_RANGE_RE.captures(token)?;
        let prefix = caps.get(1)?.as_str();
        if caps.get(3)?.as_str() != prefix {
            return None;
        }
        (prefix, caps.get(2)?.as_str(), caps.get(4)?.as_str())
    };

    let width = start.len();
    let start: u32 = start.parse().ok()?;
    let end: u32 = end.parse().ok()?;
    if end < start || end - start >= MAX_RANGE_EXPANSION {
        return None;
    }

    Some(
        (start..=end)
            .map(|n| format!("{prefix}{n:0width$}"))
            .collect(),
    )
}
