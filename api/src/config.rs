use brief_core::BriefOptions;
use brief_core::brief::{DEFAULT_MISTAKE_LIMIT, DEFAULT_SUBJECT_PREFIX};

use crate::error::AppError;
use crate::notion::NOTION_BASE_URL;

pub const DEFAULT_PORT: u16 = 8000;

/// Notion database ids of the five sources.
#[derive(Debug, Clone, Default)]
pub struct DatabaseIds {
    pub plan: String,
    pub objectives: String,
    pub resources: String,
    pub practice_tests: String,
    pub mistakes: String,
}

/// Service settings read from the environment (or `.env` in development).
///
/// Missing values are not fatal at startup; each webhook call reports what is
/// absent so a half-configured deployment still answers health checks.
#[derive(Debug, Clone)]
pub struct Config {
    pub notion_token: String,
    pub notion_base_url: String,
    pub auth_token: String,
    pub databases: DatabaseIds,
    pub port: u16,
    pub brief: BriefOptions,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        let port = lookup("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let prefix = lookup("BRIEF_SUBJECT_PREFIX")
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_SUBJECT_PREFIX.to_string());
        let mistake_limit = parse_mistake_limit(lookup("BRIEF_MISTAKE_LIMIT").as_deref());

        Self {
            notion_token: var("NOTION_TOKEN"),
            notion_base_url: lookup("NOTION_BASE_URL")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| NOTION_BASE_URL.to_string()),
            auth_token: var("AUTH_TOKEN"),
            databases: DatabaseIds {
                plan: var("PLAN_DB_ID"),
                objectives: var("OBJECTIVES_DB_ID"),
                resources: var("RESOURCES_DB_ID"),
                practice_tests: var("PRACTICE_DB_ID"),
                mistakes: var("MISTAKES_DB_ID"),
            },
            port,
            brief: BriefOptions {
                mistake_limit,
                ..BriefOptions::with_prefix(prefix)
            },
        }
    }

    /// Names of the Notion settings that are still empty.
    pub fn missing_notion_settings(&self) -> Vec<&'static str> {
        let db = &self.databases;
        [
            ("NOTION_TOKEN", &self.notion_token),
            ("PLAN_DB_ID", &db.plan),
            ("OBJECTIVES_DB_ID", &db.objectives),
            ("RESOURCES_DB_ID", &db.resources),
            ("PRACTICE_DB_ID", &db.practice_tests),
            ("MISTAKES_DB_ID", &db.mistakes),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn ensure_notion_configured(&self) -> Result<(), AppError> {
        let missing = self.missing_notion_settings();
        if missing.is_empty() {
            return Ok(());
        }
        Err(AppError::Misconfigured {
            message: format!("missing settings: {}", missing.join(", ")),
        })
    }
}

/// "0" or "none" lists every matching mistake. Values that are not a
/// non-negative count keep the default.
fn parse_mistake_limit(raw: Option<&str>) -> Option<usize> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Some(DEFAULT_MISTAKE_LIMIT);
    };
    if raw.eq_ignore_ascii_case("none") || raw == "0" {
        return None;
    }
    match raw.parse() {
        Ok(limit) => Some(limit),
        Err(_) => {
            tracing::warn!(
                value = raw,
                default = DEFAULT_MISTAKE_LIMIT,
                "BRIEF_MISTAKE_LIMIT is not a count, using the default"
            );
            Some(DEFAULT_MISTAKE_LIMIT)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let cfg = config(&[]);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.brief.subject_prefix, "MD-102");
        assert_eq!(cfg.brief.mistake_limit, Some(3));
        assert!(cfg.auth_token.is_empty());
        assert_eq!(cfg.notion_base_url, "https://api.notion.com/v1");
    }

    #[test]
    fn missing_settings_are_reported_together() {
        let cfg = config(&[("NOTION_TOKEN", "secret_x"), ("PLAN_DB_ID", "abc")]);
        assert_eq!(
            cfg.missing_notion_settings(),
            [
                "OBJECTIVES_DB_ID",
                "RESOURCES_DB_ID",
                "PRACTICE_DB_ID",
                "MISTAKES_DB_ID"
            ]
        );
        assert!(cfg.ensure_notion_configured().is_err());
    }

    #[test]
    fn whitespace_only_values_count_as_missing() {
        let cfg = config(&[("NOTION_TOKEN", "   ")]);
        assert!(cfg.missing_notion_settings().contains(&"NOTION_TOKEN"));
    }

    #[test]
    fn brief_overrides_are_read() {
        let cfg = config(&[
            ("PORT", "9090"),
            ("BRIEF_SUBJECT_PREFIX", "AZ-104"),
            ("BRIEF_MISTAKE_LIMIT", "none"),
        ]);
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.brief.subject_prefix, "AZ-104");
        assert_eq!(cfg.brief.title, "AZ-104 DAILY STUDY BRIEF");
        assert_eq!(cfg.brief.mistake_limit, None);

        let cfg = config(&[("BRIEF_MISTAKE_LIMIT", "5")]);
        assert_eq!(cfg.brief.mistake_limit, Some(5));
    }

    #[test]
    fn unusable_mistake_limit_keeps_default() {
        assert_eq!(parse_mistake_limit(Some("abc")), Some(DEFAULT_MISTAKE_LIMIT));
        assert_eq!(parse_mistake_limit(Some("-1")), Some(DEFAULT_MISTAKE_LIMIT));
        assert_eq!(parse_mistake_limit(Some("  ")), Some(DEFAULT_MISTAKE_LIMIT));
        assert_eq!(parse_mistake_limit(Some("NONE")), None);
        assert_eq!(parse_mistake_limit(Some(" 7 ")), Some(7));

        let cfg = config(&[("BRIEF_MISTAKE_LIMIT", "abc")]);
        assert_eq!(cfg.brief.mistake_limit, Some(3));
    }
}
