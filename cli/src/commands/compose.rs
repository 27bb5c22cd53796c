use std::path::Path;

use brief_core::calendar;
use brief_core::{BriefOptions, DecisionResult, SourceRecords, compose};
use chrono::{DateTime, Utc};

use crate::util::{eprint_json, print_json};

pub struct ComposeArgs<'a> {
    pub input: &'a Path,
    pub date: Option<&'a str>,
    pub timezone: &'a str,
    pub subject_prefix: Option<&'a str>,
    /// 0 lists every matching mistake
    pub mistake_limit: usize,
    pub text: bool,
}

/// Run the engine against a local fixture file instead of Notion.
pub fn run(args: ComposeArgs<'_>) -> i32 {
    let raw = match std::fs::read_to_string(args.input) {
        Ok(raw) => raw,
        Err(e) => {
            eprint_json(&serde_json::json!({
                "error": "cli_error",
                "message": format!("Cannot read {}: {e}", args.input.display())
            }));
            return 1;
        }
    };

    let result = match compose_from_str(&raw, &args, Utc::now()) {
        Ok(result) => result,
        Err(message) => {
            eprint_json(&serde_json::json!({
                "error": "validation_failed",
                "message": message
            }));
            return 1;
        }
    };

    if args.text {
        println!("{}", render_text(&result));
    } else {
        match serde_json::to_value(&result) {
            Ok(value) => print_json(&value),
            Err(e) => {
                eprint_json(&serde_json::json!({ "error": "cli_error", "message": e.to_string() }));
                return 1;
            }
        }
    }
    0
}

fn options(args: &ComposeArgs<'_>) -> BriefOptions {
    let base = match args.subject_prefix {
        Some(prefix) => BriefOptions::with_prefix(prefix),
        None => BriefOptions::default(),
    };
    BriefOptions {
        mistake_limit: (args.mistake_limit > 0).then_some(args.mistake_limit),
        ..base
    }
}

fn compose_from_str(
    raw: &str,
    args: &ComposeArgs<'_>,
    now: DateTime<Utc>,
) -> Result<DecisionResult, String> {
    let sources: SourceRecords =
        serde_json::from_str(raw).map_err(|e| format!("Invalid fixture JSON: {e}"))?;
    let run_date =
        calendar::resolve_run_date(args.date, args.timezone, now).map_err(|e| e.to_string())?;
    tracing::debug!(run_date = %run_date, plans = sources.plan.len(), "composing from fixture");
    compose(&run_date, &sources, &options(args)).map_err(|e| e.to_string())
}

/// Subject and body as the recipient would see them, or the suppression reason.
fn render_text(result: &DecisionResult) -> String {
    if result.should_send {
        format!("Subject: {}\n\n{}", result.subject, result.body)
    } else {
        let reason = serde_json::to_value(result.reason)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        format!("(not sending for {}: {reason})", result.debug.date)
    }
}
