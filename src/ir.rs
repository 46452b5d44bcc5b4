use serde::{Deserialize, Serialize};

/// A date as it arrives from upstream data.
///
/// Absent dates are modelled with `Option<DateLike>`; the layout treats a
/// missing end date as an ongoing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateLike {
    /// ISO date/date-time or `YYYY-MM` text.
    Text(String),
    /// `[year, month, day]` parts.
    Parts(Vec<i64>),
}

impl DateLike {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn ymd(year: i64, month: i64, day: i64) -> Self {
        Self::Parts(vec![year, month, day])
    }
}

impl From<&str> for DateLike {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<[i64; 3]> for DateLike {
    fn from(value: [i64; 3]) -> Self {
        Self::Parts(value.to_vec())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Project,
    Experience,
    Education,
}

impl RecordKind {
    /// Label placement and output order.
    pub const PROCESSING_ORDER: [RecordKind; 3] =
        [RecordKind::Education, RecordKind::Experience, RecordKind::Project];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Experience => "experience",
            Self::Education => "education",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRecord {
    pub id: String,
    pub title: String,
    pub kind: RecordKind,
    pub start_date: DateLike,
    #[serde(default)]
    pub end_date: Option<DateLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_hint: Option<String>,
}

impl TimelineRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        kind: RecordKind,
        start_date: impl Into<DateLike>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            start_date: start_date.into(),
            end_date: None,
            status_hint: None,
        }
    }

    pub fn ending(mut self, end_date: impl Into<DateLike>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status_hint = Some(status.into());
        self
    }

    pub fn is_ongoing(&self) -> bool {
        self.end_date.is_none()
    }
}
