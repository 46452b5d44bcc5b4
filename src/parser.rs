use crate::ir::{DateLike, RecordKind, TimelineRecord};
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("portfolio document is neither JSON nor JSON5: {0}")]
    Syntax(String),
    #[error("{kind} entry #{index} has an empty id")]
    EmptyId { kind: &'static str, index: usize },
    #[error("duplicate record id '{id}' ({kind}); ids must be unique across projects, experience and education")]
    DuplicateId { id: String, kind: &'static str },
}

/// Ids arrive as strings or integers depending on the backing store.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RecordId {
    Text(String),
    Number(i64),
}

impl RecordId {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text.trim().to_string(),
            Self::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    id: RecordId,
    pub title: String,
    #[serde(default)]
    pub start_date: Option<DateLike>,
    #[serde(default)]
    pub end_date: Option<DateLike>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    id: RecordId,
    #[serde(alias = "title")]
    pub position: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateLike>,
    #[serde(default)]
    pub end_date: Option<DateLike>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    id: RecordId,
    #[serde(alias = "title")]
    pub degree: String,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateLike>,
    #[serde(default)]
    pub end_date: Option<DateLike>,
}

/// The three content collections of the portfolio site.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDocument {
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default, alias = "experiences")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
}

fn joined_title(primary: &str, secondary: Option<&str>) -> String {
    match secondary.map(str::trim).filter(|s| !s.is_empty()) {
        Some(secondary) => format!("{} · {}", primary.trim(), secondary),
        None => primary.trim().to_string(),
    }
}

// A missing start date is carried as empty text so it normalises to "now"
// with a warning rather than failing the whole document.
fn start_or_empty(start: Option<DateLike>) -> DateLike {
    start.unwrap_or_else(|| DateLike::Text(String::new()))
}

impl PortfolioDocument {
    pub fn into_records(self) -> Vec<TimelineRecord> {
        let mut records =
            Vec::with_capacity(self.projects.len() + self.experience.len() + self.education.len());
        for entry in self.projects {
            records.push(TimelineRecord {
                id: entry.id.into_string(),
                title: entry.title.trim().to_string(),
                kind: RecordKind::Project,
                start_date: start_or_empty(entry.start_date),
                end_date: entry.end_date,
                status_hint: entry.status,
            });
        }
        for entry in self.experience {
            records.push(TimelineRecord {
                id: entry.id.into_string(),
                title: joined_title(&entry.position, entry.company.as_deref()),
                kind: RecordKind::Experience,
                start_date: start_or_empty(entry.start_date),
                end_date: entry.end_date,
                status_hint: None,
            });
        }
        for entry in self.education {
            records.push(TimelineRecord {
                id: entry.id.into_string(),
                title: joined_title(&entry.degree, entry.institution.as_deref()),
                kind: RecordKind::Education,
                start_date: start_or_empty(entry.start_date),
                end_date: entry.end_date,
                status_hint: None,
            });
        }
        records
    }
}

pub fn parse_document(input: &str) -> Result<PortfolioDocument, DocumentError> {
    match serde_json::from_str(input) {
        Ok(doc) => Ok(doc),
        Err(json_err) => json5::from_str(input).map_err(|json5_err| {
            DocumentError::Syntax(format!("{json_err}; as JSON5: {json5_err}"))
        }),
    }
}

/// Parses a portfolio document into timeline records, rejecting ids that
/// would clash in the page's element ids.
pub fn parse_records(input: &str) -> Result<Vec<TimelineRecord>, DocumentError> {
    let records = parse_document(input)?.into_records();
    validate_ids(&records)?;
    Ok(records)
}

pub fn validate_ids(records: &[TimelineRecord]) -> Result<(), DocumentError> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut per_kind = [0usize; 3];
    for record in records {
        let slot = match record.kind {
            RecordKind::Project => 0,
            RecordKind::Experience => 1,
            RecordKind::Education => 2,
        };
        let index = per_kind[slot];
        per_kind[slot] += 1;
        if record.id.is_empty() {
            return Err(DocumentError::EmptyId {
                kind: record.kind.as_str(),
                index,
            });
        }
        if !seen.insert(record.id.as_str()) {
            return Err(DocumentError::DuplicateId {
                id: record.id.clone(),
                kind: record.kind.as_str(),
            });
        }
    }
    Ok(())
}
