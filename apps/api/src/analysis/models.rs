use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ────────────────────────────────────────────────────────────────────────────
// Analysis response
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub filename: String,
    pub analysis: Analysis,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// 0–100, may be fractional.
    pub overall_score: f64,
    #[serde(default)]
    pub semantic_similarity_score: Option<f64>,
    #[serde(default)]
    pub matching_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub sections_found: Vec<String>,
    #[serde(default)]
    pub action_verbs_found: Vec<String>,
    #[serde(default)]
    pub extra_skills: Vec<String>,
    #[serde(default)]
    pub resume_skills: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Summary response (wire shape)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SummaryResponse {
    pub summary: RawSummary,
}

/// Summary as the service sends it. Array entries are either plain strings or records.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawSummary {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub projects: Vec<SummaryItem>,
    pub tech_stack: Vec<SummaryItem>,
    pub work_experience: Vec<SummaryItem>,
    pub certifications: Vec<SummaryItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SummaryItem {
    Text(String),
    Record(Map<String, Value>),
    /// Anything else (numbers, nulls, nested arrays) is dropped during normalization.
    Other(Value),
}

// ────────────────────────────────────────────────────────────────────────────
// Normalized summary
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TitledRecord {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NamedRecord {
    pub name: String,
}

/// Summary with every array entry coerced to a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResumeSummary {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub projects: Vec<TitledRecord>,
    pub tech_stack: Vec<NamedRecord>,
    pub work_experience: Vec<TitledRecord>,
    pub certifications: Vec<NamedRecord>,
}

impl From<RawSummary> for ResumeSummary {
    fn from(raw: RawSummary) -> Self {
        Self {
            name: raw.name.unwrap_or_default(),
            email: raw.email.unwrap_or_default(),
            phone: raw.phone.unwrap_or_default(),
            address: raw.address.unwrap_or_default(),
            linkedin: raw.linkedin.unwrap_or_default(),
            github: raw.github.unwrap_or_default(),
            portfolio: raw.portfolio.unwrap_or_default(),
            projects: raw.projects.into_iter().filter_map(titled).collect(),
            tech_stack: raw.tech_stack.into_iter().filter_map(named).collect(),
            work_experience: raw.work_experience.into_iter().filter_map(titled).collect(),
            certifications: raw.certifications.into_iter().filter_map(named).collect(),
        }
    }
}

fn string_field(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| record.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

fn titled(item: SummaryItem) -> Option<TitledRecord> {
    match item {
        SummaryItem::Text(title) => Some(TitledRecord {
            title,
            description: String::new(),
        }),
        SummaryItem::Record(record) => Some(TitledRecord {
            title: string_field(&record, &["title", "name", "role"])?,
            description: string_field(&record, &["description", "details", "company"])
                .unwrap_or_default(),
        }),
        SummaryItem::Other(_) => None,
    }
}

fn named(item: SummaryItem) -> Option<NamedRecord> {
    match item {
        SummaryItem::Text(name) => Some(NamedRecord { name }),
        SummaryItem::Record(record) => Some(NamedRecord {
            name: string_field(&record, &["name", "title"])?,
        }),
        SummaryItem::Other(_) => None,
    }
}
