use chrono::NaiveDate;

use crate::model::PlanEntry;

/// Outcome of the suppression check. Each state is terminal for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Send,
    NoPlan,
    Completed,
}

/// Only plans dated `date` are candidates; the first one in input order wins.
pub fn select_plan(plans: &[PlanEntry], date: NaiveDate) -> Option<&PlanEntry> {
    let mut candidates = plans.iter().filter(|plan| plan.date == Some(date));
    let first = candidates.next();
    let extra = candidates.count();
    if extra > 0 {
        tracing::warn!(
            date = %date,
            duplicates = extra,
            "multiple plan entries for date, using the first"
        );
    }
    first
}

pub fn decide(plan: Option<&PlanEntry>) -> Decision {
    match plan {
        None => Decision::NoPlan,
        Some(plan) if plan.is_completed() => Decision::Completed,
        Some(_) => Decision::Send,
    }
}
