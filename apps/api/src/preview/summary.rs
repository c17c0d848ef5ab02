//! Projection of a resume-summary result into display text.

use serde::Serialize;

use crate::analysis::models::{ResumeSummary, TitledRecord};
use crate::document::model::filled;
use crate::preview::project::EMAIL_UNAVAILABLE;
use crate::preview::text::{is_valid_email, normalize_entry, NormalizedEntry};

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryProject {
    pub heading: String,
    pub details: Vec<String>,
}

impl From<NormalizedEntry> for SummaryProject {
    fn from(entry: NormalizedEntry) -> Self {
        Self {
            heading: entry.heading,
            details: entry.details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryView {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Empty when no project survives normalization; rendered as "N/A".
    pub projects: Vec<SummaryProject>,
    pub tech_stack: String,
    pub work_experience: String,
    pub certifications: String,
}

pub fn project_summary(summary: &ResumeSummary) -> SummaryView {
    SummaryView {
        name: or_na(&summary.name),
        email: if is_valid_email(summary.email.trim()) {
            summary.email.trim().to_string()
        } else {
            EMAIL_UNAVAILABLE.to_string()
        },
        phone: or_na(&summary.phone),
        address: or_na(&summary.address),
        projects: summary
            .projects
            .iter()
            .filter_map(project_entry)
            .map(SummaryProject::from)
            .collect(),
        tech_stack: join_or_na(summary.tech_stack.iter().map(|r| r.name.as_str())),
        work_experience: join_or_na(
            summary
                .work_experience
                .iter()
                .map(|r| r.title.as_str()),
        ),
        certifications: join_or_na(
            summary
                .certifications
                .iter()
                .map(|r| r.name.as_str()),
        ),
    }
}

/// A record with a separate description is treated like `"<title> - <description>"`.
fn project_entry(record: &TitledRecord) -> Option<NormalizedEntry> {
    if filled(&record.description) {
        normalize_entry(&format!("{} - {}", record.title.trim(), record.description.trim()))
    } else {
        normalize_entry(&record.title)
    }
}

fn or_na(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

fn join_or_na<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let joined = values
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    or_na(&joined)
}
