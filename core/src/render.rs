//! Plain-text email rendering. Sections without content are left out.

use crate::brief::BriefOptions;
use crate::link::{LinkedBrief, LinkedObjective, LinkedSession, ResourceRef};
use crate::model::{Mistake, PracticeTest, Resource};

const RULE: &str = "================================";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBrief {
    pub subject: String,
    pub body: String,
}

/// `MD-102 — Daily Study Brief (🔥 CRITICAL)`, or without the parenthesis
/// when the plan has no focus priority.
pub fn subject(prefix: &str, focus_priority: &str) -> String {
    let base = format!("{prefix} — Daily Study Brief");
    if focus_priority.is_empty() {
        base
    } else {
        format!("{base} ({focus_priority})")
    }
}

pub fn render(date: &str, linked: &LinkedBrief<'_>, options: &BriefOptions) -> RenderedBrief {
    let sections = [
        header_section(date, linked, options),
        session_section(&linked.sessions[0]),
        session_section(&linked.sessions[1]),
        objectives_section(&linked.objectives),
        practice_test_section(linked.practice_test),
        mistakes_section(&linked.mistakes),
    ];

    let body = sections
        .iter()
        .filter(|section| !section.lines.is_empty())
        .map(Section::to_text)
        .collect::<Vec<_>>()
        .join("\n\n");

    RenderedBrief {
        subject: subject(&options.subject_prefix, &linked.plan.focus_priority),
        body,
    }
}

struct Section {
    heading: Option<String>,
    lines: Vec<String>,
}

impl Section {
    fn titled(heading: impl Into<String>) -> Self {
        Self {
            heading: Some(heading.into()),
            lines: Vec::new(),
        }
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn to_text(&self) -> String {
        let mut out = Vec::with_capacity(self.lines.len() + 3);
        if let Some(heading) = &self.heading {
            out.push(RULE);
            out.push(heading.as_str());
            out.push(RULE);
        }
        out.extend(self.lines.iter().map(String::as_str));
        out.join("\n")
    }
}

fn header_section(date: &str, linked: &LinkedBrief<'_>, options: &BriefOptions) -> Section {
    let plan = linked.plan;
    let mut section = Section {
        heading: None,
        lines: vec![options.title.clone(), format!("Date: {date}")],
    };
    if !plan.phase.is_empty() {
        section.push(format!("Phase: {}", plan.phase));
    }
    if !plan.focus_priority.is_empty() {
        section.push(format!("Priority: {}", plan.focus_priority));
    }
    section
}

fn session_section(linked: &LinkedSession<'_>) -> Section {
    let title = match linked.number {
        1 => "SESSION 1 — LEARN",
        _ => "SESSION 2 — LAB / PRACTICE",
    };
    let mut section = Section::titled(title);
    if linked.session.is_empty() {
        return section;
    }

    if !linked.session.description.is_empty() {
        section.push(linked.session.description.clone());
    }
    if !linked.resources.is_empty() {
        section.push("Resources:");
        for resource in &linked.resources {
            section.push(format!("- {}", resource_ref_label(resource)));
        }
    }
    let mark = if linked.session.done { "x" } else { " " };
    section.push(format!("[{mark}] Session {} done", linked.number));
    section
}

fn objectives_section(objectives: &[LinkedObjective<'_>]) -> Section {
    let mut section = Section::titled("FOCUS OBJECTIVES");
    for linked in objectives {
        let objective = linked.objective;
        let mut line = format!("- {}", objective.id);
        if !objective.description.is_empty() {
            line.push_str(&format!(" — {}", objective.description));
        }

        let details: Vec<String> = [
            ("Priority", &objective.priority),
            ("Exam Area", &objective.exam_area),
            ("Skill", &objective.skill_group),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("{label}: {value}"))
        .collect();
        if !details.is_empty() {
            line.push_str(&format!(" ({})", details.join(" | ")));
        }
        section.push(line);

        for resource in &linked.resources {
            section.push(format!("  - {}", resource_label(resource)));
            if !resource.why_it_matters.is_empty() {
                section.push(format!("    Why: {}", resource.why_it_matters));
            }
        }
    }
    section
}

fn practice_test_section(test: Option<&PracticeTest>) -> Section {
    let mut section = Section::titled("PRACTICE TEST");
    let Some(test) = test else {
        return section;
    };

    let headline = [test.provider.as_str(), test.test_name.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" — ");
    if headline.is_empty() {
        section.push("Practice test scheduled");
    } else {
        section.push(headline);
    }
    if !test.primary_focus.is_empty() {
        section.push(format!("Focus: {}", test.primary_focus));
    }
    if !test.notes.is_empty() {
        section.push(format!("Notes: {}", test.notes));
    }
    section
}

fn mistakes_section(mistakes: &[&Mistake]) -> Section {
    let mut section = Section::titled("MISTAKES TO REVIEW");
    for mistake in mistakes {
        let objective = if mistake.objective_id.is_empty() {
            "General"
        } else {
            mistake.objective_id.as_str()
        };
        let summary = if mistake.summary.is_empty() {
            "(no summary)"
        } else {
            mistake.summary.as_str()
        };
        section.push(format!("- {objective}: {summary}"));
        if !mistake.correct_rule.is_empty() {
            section.push(format!("  Rule: {}", mistake.correct_rule));
        }
        if !mistake.recognition_tip.is_empty() {
            section.push(format!("  Tip: {}", mistake.recognition_tip));
        }
    }
    section
}

/// `R04: Entra docs — https://...`, dropping whichever of name/url is blank.
fn resource_label(resource: &Resource) -> String {
    let mut label = resource.id.clone();
    if !resource.name.is_empty() {
        label.push_str(&format!(": {}", resource.name));
    }
    if !resource.url.is_empty() {
        label.push_str(&format!(" — {}", resource.url));
    }
    label
}

fn resource_ref_label(resource: &ResourceRef<'_>) -> String {
    match resource {
        ResourceRef::Resolved(resource) => resource_label(resource),
        ResourceRef::Unresolved(raw) => raw.to_string(),
    }
}
