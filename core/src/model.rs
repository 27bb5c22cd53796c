//! Canonical, fully-typed entities built from raw source records.
//!
//! Normalization is total: every field has a default, so nothing past this
//! boundary deals with missing data.

use chrono::NaiveDate;

use crate::brief::SourceRecords;
use crate::ids::IdList;
use crate::records::RawRecord;

/// Property names of the five source databases.
pub mod fields {
    pub mod plan {
        pub const DATE: &str = "Date";
        pub const PHASE: &str = "Phase";
        pub const FOCUS_PRIORITY: &str = "Focus Priority";
        pub const SESSION_1: &str = "Session 1 (1 hr) – Learn";
        pub const SESSION_1_RESOURCES: &str = "Session 1 Resources (IDs/URLs)";
        pub const SESSION_1_DONE: &str = "Session 1 Done";
        pub const SESSION_2: &str = "Session 2 (1 hr) – Lab/Practice";
        pub const SESSION_2_RESOURCES: &str = "Session 2 Resources (IDs/URLs)";
        pub const SESSION_2_DONE: &str = "Session 2 Done";
        pub const FOCUS_OBJECTIVES: &str = "Focus objectives (IDs)";
    }

    pub mod objective {
        pub const ID: &str = "Objective ID";
        pub const DESCRIPTION: &str = "Objective";
        pub const EXAM_AREA: &str = "Exam Area";
        pub const SKILL_GROUP: &str = "Skill Group";
        pub const PRIORITY: &str = "Priority";
        pub const PRIMARY_RESOURCES: &str = "Primary Resources (IDs)";
    }

    pub mod resource {
        pub const ID: &str = "Resource ID";
        pub const NAME: &str = "Name";
        pub const TYPE: &str = "Type";
        pub const URL: &str = "URL";
        pub const WHY_IT_MATTERS: &str = "Why it matters";
    }

    pub mod practice_test {
        pub const DATE: &str = "Date";
        pub const PROVIDER: &str = "Provider";
        pub const TEST_NAME: &str = "Test";
        pub const PRIMARY_FOCUS: &str = "Primary Focus";
        pub const NOTES: &str = "Notes";
    }

    pub mod mistake {
        pub const RESOLVED: &str = "Resolved";
        pub const OBJECTIVE_ID: &str = "Objective ID";
        pub const SUMMARY: &str = "Mistake Summary";
        pub const CORRECT_RULE: &str = "Correct Rule";
        pub const RECOGNITION_TIP: &str = "Recognition Tip";
    }
}

/// One of the two study sessions of a plan day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub description: String,
    pub resource_ids: IdList,
    pub done: bool,
}

impl Session {
    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.resource_ids.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanEntry {
    pub date: Option<NaiveDate>,
    pub phase: String,
    pub focus_priority: String,
    pub session_1: Session,
    pub session_2: Session,
    pub focus_objective_ids: IdList,
}

impl PlanEntry {
    pub fn from_record(record: &RawRecord) -> Self {
        use fields::plan::*;

        Self {
            date: record.date(DATE),
            phase: record.text(PHASE),
            focus_priority: record.text(FOCUS_PRIORITY),
            session_1: Session {
                description: record.text(SESSION_1),
                resource_ids: IdList::parse(&record.text(SESSION_1_RESOURCES)),
                done: record.flag(SESSION_1_DONE),
            },
            session_2: Session {
                description: record.text(SESSION_2),
                resource_ids: IdList::parse(&record.text(SESSION_2_RESOURCES)),
                done: record.flag(SESSION_2_DONE),
            },
            focus_objective_ids: IdList::parse(&record.text(FOCUS_OBJECTIVES)),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.session_1.done && self.session_2.done
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Objective {
    pub id: String,
    pub description: String,
    pub exam_area: String,
    pub skill_group: String,
    pub priority: String,
    pub primary_resource_ids: IdList,
}

impl Objective {
    pub fn from_record(record: &RawRecord) -> Self {
        use fields::objective::*;

        Self {
            id: record.text(ID),
            description: record.text(DESCRIPTION),
            exam_area: record.text(EXAM_AREA),
            skill_group: record.text(SKILL_GROUP),
            priority: record.text(PRIORITY),
            primary_resource_ids: IdList::parse(&record.text(PRIMARY_RESOURCES)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub url: String,
    pub why_it_matters: String,
}

impl Resource {
    pub fn from_record(record: &RawRecord) -> Self {
        use fields::resource::*;

        Self {
            id: record.text(ID),
            name: record.text(NAME),
            kind: record.text(TYPE),
            url: record.text(URL),
            why_it_matters: record.text(WHY_IT_MATTERS),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PracticeTest {
    pub date: Option<NaiveDate>,
    pub provider: String,
    pub test_name: String,
    pub primary_focus: String,
    pub notes: String,
}

impl PracticeTest {
    pub fn from_record(record: &RawRecord) -> Self {
        use fields::practice_test::*;

        Self {
            date: record.date(DATE),
            provider: record.text(PROVIDER),
            test_name: record.text(TEST_NAME),
            primary_focus: record.text(PRIMARY_FOCUS),
            notes: record.text(NOTES),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mistake {
    pub resolved: bool,
    pub objective_id: String,
    pub summary: String,
    pub correct_rule: String,
    pub recognition_tip: String,
}

impl Mistake {
    pub fn from_record(record: &RawRecord) -> Self {
        use fields::mistake::*;

        Self {
            resolved: record.flag(RESOLVED),
            objective_id: record.text(OBJECTIVE_ID),
            summary: record.text(SUMMARY),
            correct_rule: record.text(CORRECT_RULE),
            recognition_tip: record.text(RECOGNITION_TIP),
        }
    }
}

/// All five sources after normalization, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyData {
    pub plans: Vec<PlanEntry>,
    pub objectives: Vec<Objective>,
    pub resources: Vec<Resource>,
    pub practice_tests: Vec<PracticeTest>,
    pub mistakes: Vec<Mistake>,
}

impl StudyData {
    pub fn normalize(sources: &SourceRecords) -> Self {
        Self {
            plans: sources.plan.iter().map(PlanEntry::from_record).collect(),
            objectives: sources.objectives.iter().map(Objective::from_record).collect(),
            resources: sources.resources.iter().map(Resource::from_record).collect(),
            practice_tests: sources
                .practice_tests
                .iter()
                .map(PracticeTest::from_record)
                .collect(),
            mistakes: sources.mistakes.iter().map(Mistake::from_record).collect(),
        }
    }
}
