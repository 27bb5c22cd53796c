//! The decision envelope and the single entry point that produces it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::calendar;
use crate::error::BriefError;
use crate::link;
use crate::model::{PlanEntry, StudyData};
use crate::policy::{self, Decision};
use crate::records::RawRecord;
use crate::render;

/// Raw records for the five sources, already fetched by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceRecords {
    #[serde(default)]
    pub plan: Vec<RawRecord>,
    #[serde(default)]
    pub objectives: Vec<RawRecord>,
    #[serde(default)]
    pub resources: Vec<RawRecord>,
    #[serde(default)]
    pub practice_tests: Vec<RawRecord>,
    #[serde(default)]
    pub mistakes: Vec<RawRecord>,
}

#[derive(Debug, Clone)]
pub struct BriefOptions {
    pub subject_prefix: String,
    /// First line of the body.
    pub title: String,
    /// Maximum number of mistakes listed; `None` lists all.
    pub mistake_limit: Option<usize>,
}

pub const DEFAULT_SUBJECT_PREFIX: &str = "MD-102";
pub const DEFAULT_MISTAKE_LIMIT: usize = 3;

impl BriefOptions {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            title: format!("{} DAILY STUDY BRIEF", prefix.to_uppercase()),
            subject_prefix: prefix,
            mistake_limit: Some(DEFAULT_MISTAKE_LIMIT),
        }
    }
}

impl Default for BriefOptions {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_SUBJECT_PREFIX)
    }
}

/// Why the email was or was not produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    Ok,
    NoPlan,
    Completed,
}

impl From<Decision> for Reason {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Send => Reason::Ok,
            Decision::NoPlan => Reason::NoPlan,
            Decision::Completed => Reason::Completed,
        }
    }
}

/// Counters describing what the engine matched for the date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DebugInfo {
    /// The run date exactly as supplied
    pub date: String,
    pub objectives_count: usize,
    pub resources_count: usize,
    pub practice_test_found: bool,
    pub mistakes_found: usize,
}

/// Response body of the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DecisionResult {
    pub should_send: bool,
    /// Empty when not sending
    pub subject: String,
    /// Empty when not sending
    pub body: String,
    pub reason: Reason,
    pub debug: DebugInfo,
}

impl DecisionResult {
    fn suppressed(run_date: &str, decision: Decision) -> Self {
        let reason = Reason::from(decision);
        tracing::debug!(date = run_date, reason = ?reason, "study brief suppressed");
        Self {
            should_send: false,
            subject: String::new(),
            body: String::new(),
            reason,
            debug: DebugInfo {
                date: run_date.to_string(),
                ..Default::default()
            },
        }
    }
}

/// The suppressed result for `run_date` when the plan records rule out a
/// brief, or `None` when one goes out.
///
/// Reads nothing but the plan, so a caller can skip fetching the other
/// sources on days that stay silent.
pub fn check_suppression(
    run_date: &str,
    plan: &[RawRecord],
) -> Result<Option<DecisionResult>, BriefError> {
    let date = calendar::parse_run_date(run_date)?;
    let plans: Vec<PlanEntry> = plan.iter().map(PlanEntry::from_record).collect();
    match policy::decide(policy::select_plan(&plans, date)) {
        Decision::Send => Ok(None),
        decision => Ok(Some(DecisionResult::suppressed(run_date, decision))),
    }
}

/// Decide whether to send the study brief for `run_date` and compose it.
///
/// Fails only when `run_date` is not a `YYYY-MM-DD` date. Identical inputs
/// always produce identical output.
pub fn compose(
    run_date: &str,
    sources: &SourceRecords,
    options: &BriefOptions,
) -> Result<DecisionResult, BriefError> {
    let date = calendar::parse_run_date(run_date)?;
    let data = StudyData::normalize(sources);

    let candidate = policy::select_plan(&data.plans, date);
    let plan = match (policy::decide(candidate), candidate) {
        (Decision::Send, Some(plan)) => plan,
        (decision, _) => return Ok(DecisionResult::suppressed(run_date, decision)),
    };

    let linked = link::link(plan, date, &data, options.mistake_limit);
    let counters = DebugInfo {
        date: run_date.to_string(),
        objectives_count: linked.objectives.len(),
        resources_count: linked.resource_ids.len(),
        practice_test_found: linked.practice_test.is_some(),
        mistakes_found: linked.mistakes.len(),
    };

    let iso_date = date.format("%Y-%m-%d").to_string();
    let rendered = render::render(&iso_date, &linked, options);

    tracing::debug!(
        date = %date,
        objectives = counters.objectives_count,
        resources = counters.resources_count,
        practice_test = counters.practice_test_found,
        mistakes = counters.mistakes_found,
        "study brief composed"
    );

    Ok(DecisionResult {
        should_send: true,
        subject: rendered.subject,
        body: rendered.body,
        reason: Reason::Ok,
        debug: counters,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn records(values: Vec<Value>) -> Vec<RawRecord> {
        values.into_iter().map(RawRecord::from).collect()
    }

    fn open_plan(date: &str) -> Value {
        json!({
            "Date": { "type": "date", "date": { "start": date } },
            "Phase": "Phase 1 – Identity",
            "Focus Priority": { "type": "select", "select": { "name": "🔥 CRITICAL" } },
            "Session 1 (1 hr) – Learn": "Read the Entra join docs",
            "Session 1 Resources (IDs/URLs)": "R04, R99",
            "Session 1 Done": false,
            "Session 2 (1 hr) – Lab/Practice": "Join a VM",
            "Session 2 Resources (IDs/URLs)": "R04 R51",
            "Session 2 Done": true,
            "Focus objectives (IDs)": "P-ENTRA-01, P-GONE-07"
        })
    }

    fn sources() -> SourceRecords {
        SourceRecords {
            plan: records(vec![open_plan("2025-01-02")]),
            objectives: records(vec![json!({
                "Objective ID": "P-ENTRA-01",
                "Objective": "Implement device join",
                "Priority": "High",
                "Primary Resources (IDs)": "R51, R60"
            })]),
            resources: records(vec![
                json!({ "Resource ID": "R04", "Name": "Entra join overview", "URL": "https://learn.microsoft.com/entra/join" }),
                json!({ "Resource ID": "R51", "Name": "Hybrid join lab", "URL": "https://learn.microsoft.com/entra/hybrid" }),
                json!({ "Resource ID": "R60", "Name": "Join troubleshooting" }),
            ]),
            practice_tests: Vec::new(),
            mistakes: records(vec![
                json!({ "Resolved": false, "Objective ID": "P-ENTRA-01", "Mistake Summary": "Picked registered over joined", "Correct Rule": "Joined means org-owned" }),
                json!({ "Resolved": true, "Objective ID": "P-ENTRA-01", "Mistake Summary": "old" }),
                json!({ "Resolved": false, "Objective ID": "P-OTHER-02", "Mistake Summary": "unrelated" }),
            ]),
        }
    }

    #[test]
    fn no_plan_for_date_suppresses() {
        let result = compose("2025-01-05", &sources(), &BriefOptions::default()).expect("valid date");
        assert!(!result.should_send);
        assert_eq!(result.reason, Reason::NoPlan);
        assert_eq!(result.subject, "");
        assert_eq!(result.body, "");
        assert_eq!(
            result.debug,
            DebugInfo {
                date: "2025-01-05".into(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn both_sessions_done_suppresses_regardless_of_data() {
        let mut data = sources();
        data.plan = records(vec![json!({
            "Date": "2025-01-02",
            "Session 1 Done": { "type": "checkbox", "checkbox": true },
            "Session 2 Done": { "type": "checkbox", "checkbox": true },
            "Focus objectives (IDs)": "P-ENTRA-01"
        })]);
        let result = compose("2025-01-02", &data, &BriefOptions::default()).expect("valid date");
        assert!(!result.should_send);
        assert_eq!(result.reason, Reason::Completed);
        assert!(result.subject.is_empty());
        assert!(result.body.is_empty());
        assert_eq!(result.debug.date, "2025-01-02");
    }

    #[test]
    fn suppression_check_reads_only_the_plan() {
        let plan = records(vec![open_plan("2025-01-02")]);
        assert_eq!(check_suppression("2025-01-02", &plan), Ok(None));

        let silent = check_suppression("2025-01-05", &plan)
            .expect("valid date")
            .expect("no plan for the fifth");
        assert_eq!(silent.reason, Reason::NoPlan);
        assert_eq!(
            silent,
            compose("2025-01-05", &sources(), &BriefOptions::default()).expect("valid date")
        );

        let done = records(vec![json!({
            "Date": "2025-01-02",
            "Session 1 Done": true,
            "Session 2 Done": true
        })]);
        let silent = check_suppression("2025-01-02", &done)
            .expect("valid date")
            .expect("completed day");
        assert_eq!(silent.reason, Reason::Completed);
        assert_eq!(silent.debug.objectives_count, 0);

        assert!(check_suppression("01/02/2025", &plan).is_err());
    }

    #[test]
    fn open_plan_composes_full_brief() {
        let result = compose("2025-01-02", &sources(), &BriefOptions::default()).expect("valid date");

        assert!(result.should_send);
        assert_eq!(result.reason, Reason::Ok);
        assert_eq!(result.subject, "MD-102 — Daily Study Brief (🔥 CRITICAL)");
        assert!(result.body.starts_with(
            "MD-102 DAILY STUDY BRIEF\nDate: 2025-01-02\nPhase: Phase 1 – Identity\nPriority: 🔥 CRITICAL"
        ));
        assert!(result.body.contains("SESSION 1 — LEARN"));
        assert!(result.body.contains("- R04: Entra join overview — https://learn.microsoft.com/entra/join"));
        assert!(result.body.contains("- R99\n[ ] Session 1 done"));
        assert!(result.body.contains("[x] Session 2 done"));
        assert!(result.body.contains("FOCUS OBJECTIVES"));
        assert!(result.body.contains("- P-ENTRA-01 — Implement device join (Priority: High)"));
        assert!(!result.body.contains("P-GONE-07"));
        assert!(!result.body.contains("PRACTICE TEST"));
        assert!(result.body.contains("- P-ENTRA-01: Picked registered over joined\n  Rule: Joined means org-owned"));
        assert!(!result.body.contains("unrelated"));

        assert_eq!(
            result.debug,
            DebugInfo {
                date: "2025-01-02".into(),
                objectives_count: 1,
                // R04, R51, R60; R99 never resolves
                resources_count: 3,
                practice_test_found: false,
                mistakes_found: 1,
            }
        );
    }

    #[test]
    fn practice_test_for_date_is_rendered() {
        let mut data = sources();
        data.practice_tests = records(vec![
            json!({ "Date": "2025-01-01", "Provider": "MeasureUp", "Test": "Set A" }),
            json!({
                "Date": { "type": "date", "date": { "start": "2025-01-02" } },
                "Provider": { "type": "select", "select": { "name": "Tutorials Dojo" } },
                "Test": "Full mock 2",
                "Primary Focus": "Intune"
            }),
        ]);
        let result = compose("2025-01-02", &data, &BriefOptions::default()).expect("valid date");
        assert!(result.debug.practice_test_found);
        assert!(result.body.contains("PRACTICE TEST\n================================\nTutorials Dojo — Full mock 2\nFocus: Intune"));
        assert!(!result.body.contains("Set A"));
    }

    #[test]
    fn first_plan_for_date_wins() {
        let mut data = sources();
        let mut second = open_plan("2025-01-02");
        second["Phase"] = json!("Second row");
        data.plan = records(vec![open_plan("2025-01-02"), second]);
        let result = compose("2025-01-02", &data, &BriefOptions::default()).expect("valid date");
        assert!(result.body.contains("Phase: Phase 1 – Identity"));
        assert!(!result.body.contains("Second row"));
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let data = sources();
        let options = BriefOptions::default();
        let first = compose("2025-01-02", &data, &options).expect("valid date");
        let second = compose("2025-01-02", &data, &options).expect("valid date");
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_date_is_an_error_not_no_plan() {
        let err = compose("01/02/2025", &sources(), &BriefOptions::default()).unwrap_err();
        assert_eq!(err, BriefError::InvalidDate("01/02/2025".into()));
    }

    #[test]
    fn custom_prefix_and_unlimited_mistakes() {
        let mut data = sources();
        data.mistakes = records(
            (0..5)
                .map(|i| json!({ "Resolved": false, "Mistake Summary": format!("general {i}") }))
                .collect(),
        );
        let options = BriefOptions {
            mistake_limit: None,
            ..BriefOptions::with_prefix("az-104")
        };
        let result = compose("2025-01-02", &data, &options).expect("valid date");
        assert_eq!(result.subject, "az-104 — Daily Study Brief (🔥 CRITICAL)");
        assert!(result.body.starts_with("AZ-104 DAILY STUDY BRIEF"));
        assert_eq!(result.debug.mistakes_found, 5);

        let capped = compose("2025-01-02", &data, &BriefOptions::default()).expect("valid date");
        assert_eq!(capped.debug.mistakes_found, 3);
        assert!(!capped.body.contains("general 3"));
    }

    #[test]
    fn result_serializes_with_snake_case_keys() {
        let result = compose("2025-01-05", &SourceRecords::default(), &BriefOptions::default())
            .expect("valid date");
        let value = serde_json::to_value(&result).expect("serializable");
        assert_eq!(
            value,
            json!({
                "should_send": false,
                "subject": "",
                "body": "",
                "reason": "no_plan",
                "debug": {
                    "date": "2025-01-05",
                    "objectives_count": 0,
                    "resources_count": 0,
                    "practice_test_found": false,
                    "mistakes_found": 0
                }
            })
        );
    }

    #[test]
    fn source_records_accept_missing_collections() {
        let parsed: SourceRecords =
            serde_json::from_value(json!({ "plan": [open_plan("2025-01-02")] })).expect("parses");
        assert_eq!(parsed.plan.len(), 1);
        assert!(parsed.mistakes.is_empty());
    }
}
