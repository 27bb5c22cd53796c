use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::BriefError;

pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Parse a strict `YYYY-MM-DD` run date.
pub fn parse_run_date(raw: &str) -> Result<NaiveDate, BriefError> {
    let trimmed = raw.trim();
    let well_formed = trimmed.len() == 10
        && trimmed.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(BriefError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| BriefError::InvalidDate(raw.to_string()))
}

pub fn parse_timezone(raw: &str) -> Result<Tz, BriefError> {
    raw.trim()
        .parse::<Tz>()
        .map_err(|_| BriefError::UnknownTimezone(raw.to_string()))
}

/// The requested run date, or the calendar day `now` falls on in `timezone`.
/// Returned as `YYYY-MM-DD`.
pub fn resolve_run_date(
    run_date: Option<&str>,
    timezone: &str,
    now: DateTime<Utc>,
) -> Result<String, BriefError> {
    match run_date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(date) => parse_run_date(date).map(|d| d.format("%Y-%m-%d").to_string()),
        None => {
            let tz = parse_timezone(timezone)?;
            Ok(now.with_timezone(&tz).date_naive().format("%Y-%m-%d").to_string())
        }
    }
}
