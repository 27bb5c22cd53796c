//! Cross-references plan ids against the read-only catalogs.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::ids::IdList;
use crate::model::{Mistake, Objective, PlanEntry, PracticeTest, Resource, Session, StudyData};

/// Entities addressable by a human-assigned id.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Objective {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Resource {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Read-only lookup table over a slice of entities.
/// The first record wins when two share an id; blank ids are not indexed.
#[derive(Debug)]
pub struct Catalog<'a, T> {
    by_id: HashMap<&'a str, &'a T>,
}

impl<'a, T: Keyed> Catalog<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        let mut by_id = HashMap::with_capacity(items.len());
        for item in items {
            let key = item.key().trim();
            if !key.is_empty() {
                by_id.entry(key).or_insert(item);
            }
        }
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a T> {
        self.by_id.get(id.trim()).copied()
    }

    /// Matched entities in id order. Unmatched ids are dropped.
    pub fn resolve(&self, ids: &IdList) -> Vec<&'a T> {
        ids.iter().filter_map(|id| self.get(id)).collect()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// A session resource reference: either a catalog hit or the raw token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceRef<'a> {
    Resolved(&'a Resource),
    Unresolved(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedSession<'a> {
    pub number: u8,
    pub session: &'a Session,
    pub resources: Vec<ResourceRef<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedObjective<'a> {
    pub objective: &'a Objective,
    pub resources: Vec<&'a Resource>,
}

/// Everything the renderer needs for one plan day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedBrief<'a> {
    pub plan: &'a PlanEntry,
    pub sessions: [LinkedSession<'a>; 2],
    pub objectives: Vec<LinkedObjective<'a>>,
    pub practice_test: Option<&'a PracticeTest>,
    pub mistakes: Vec<&'a Mistake>,
    /// Distinct resolved resource ids across sessions and objectives.
    pub resource_ids: IdList,
}

/// Resolve the plan's sessions, objectives, practice test and mistakes.
pub fn link<'a>(
    plan: &'a PlanEntry,
    date: NaiveDate,
    data: &'a StudyData,
    mistake_limit: Option<usize>,
) -> LinkedBrief<'a> {
    let objectives = Catalog::new(&data.objectives);
    let resources = Catalog::new(&data.resources);
    let mut resource_ids = IdList::new();

    let mut link_session = |number: u8, session: &'a Session| {
        let refs = session
            .resource_ids
            .iter()
            .map(|id| match resources.get(id) {
                Some(resource) => {
                    resource_ids.insert(resource.id.trim());
                    ResourceRef::Resolved(resource)
                }
                None => ResourceRef::Unresolved(id),
            })
            .collect();
        LinkedSession {
            number,
            session,
            resources: refs,
        }
    };
    let sessions = [
        link_session(1, &plan.session_1),
        link_session(2, &plan.session_2),
    ];

    let objectives: Vec<LinkedObjective<'a>> = objectives
        .resolve(&plan.focus_objective_ids)
        .into_iter()
        .map(|objective| {
            let primary = resources.resolve(&objective.primary_resource_ids);
            for resource in &primary {
                resource_ids.insert(resource.id.trim());
            }
            LinkedObjective {
                objective,
                resources: primary,
            }
        })
        .collect();

    LinkedBrief {
        plan,
        sessions,
        objectives,
        practice_test: select_practice_test(&data.practice_tests, date),
        mistakes: select_mistakes(&data.mistakes, &plan.focus_objective_ids, mistake_limit),
        resource_ids,
    }
}

/// First practice test logged for the date.
pub fn select_practice_test(tests: &[PracticeTest], date: NaiveDate) -> Option<&PracticeTest> {
    tests.iter().find(|test| test.date == Some(date))
}

/// Unresolved mistakes that are general (blank objective) or tied to one of
/// the day's focus objectives, in input order, capped at `limit`.
pub fn select_mistakes<'a>(
    mistakes: &'a [Mistake],
    focus_ids: &IdList,
    limit: Option<usize>,
) -> Vec<&'a Mistake> {
    mistakes
        .iter()
        .filter(|m| !m.resolved)
        .filter(|m| m.objective_id.trim().is_empty() || focus_ids.contains(&m.objective_id))
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}
