//! Structured candidate search filters.
//!
//! A [`CandidateFilter`] holds every optional search key. Only keys that are
//! present and non-empty become [`Predicate`]s, and the predicates compile into
//! a parameterized `WHERE` clause joined with `AND`.

use chrono::NaiveDate;
use rusqlite::types::Value;
use serde::{Deserialize, Deserializer, de};

use crate::types::CandidateStatus;

/// Status clause: a single value or a membership list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    One(CandidateStatus),
    AnyOf(Vec<CandidateStatus>),
}

/// Recruiter clause. `Unassigned` matches `recruiter_id IS NULL` and is
/// distinct from not filtering on recruiter at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecruiterFilter {
    Assigned(i64),
    Unassigned,
}

/// One active search condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring of first name, last name, email or skills.
    /// Folding follows Unicode, not just ASCII.
    Text(String),
    Status(StatusFilter),
    MinExperience(i64),
    MaxExperience(i64),
    Location(String),
    Recruiter(RecruiterFilter),
    Source(String),
    Position(String),
    CreatedOnOrAfter(NaiveDate),
    CreatedOnOrBefore(NaiveDate),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CandidateFilter {
    #[serde(default)]
    pub search_text: Option<String>,
    #[serde(default, deserialize_with = "deserialize_status")]
    pub status: Option<StatusFilter>,
    #[serde(default)]
    pub min_experience: Option<i64>,
    #[serde(default)]
    pub max_experience: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    /// Absent: no clause. `null`: unassigned candidates only.
    #[serde(default, deserialize_with = "deserialize_recruiter")]
    pub recruiter_id: Option<RecruiterFilter>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl CandidateFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: CandidateStatus) -> Self {
        self.status = Some(StatusFilter::One(status));
        self
    }

    #[must_use]
    pub fn statuses(mut self, statuses: impl IntoIterator<Item = CandidateStatus>) -> Self {
        self.status = Some(StatusFilter::AnyOf(statuses.into_iter().collect()));
        self
    }

    #[must_use]
    pub fn min_experience(mut self, years: i64) -> Self {
        self.min_experience = Some(years);
        self
    }

    #[must_use]
    pub fn max_experience(mut self, years: i64) -> Self {
        self.max_experience = Some(years);
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn recruiter(mut self, recruiter_id: i64) -> Self {
        self.recruiter_id = Some(RecruiterFilter::Assigned(recruiter_id));
        self
    }

    #[must_use]
    pub fn unassigned(mut self) -> Self {
        self.recruiter_id = Some(RecruiterFilter::Unassigned);
        self
    }

    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    #[must_use]
    pub fn created_from(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    #[must_use]
    pub fn created_until(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// The active predicates, in a fixed order.
    #[must_use]
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Some(text) = active_text(self.search_text.as_deref()) {
            predicates.push(Predicate::Text(text.to_string()));
        }
        match &self.status {
            Some(StatusFilter::AnyOf(list)) if list.is_empty() => {}
            Some(status) => predicates.push(Predicate::Status(status.clone())),
            None => {}
        }
        if let Some(min) = self.min_experience {
            predicates.push(Predicate::MinExperience(min));
        }
        if let Some(max) = self.max_experience {
            predicates.push(Predicate::MaxExperience(max));
        }
        if let Some(location) = active_text(self.location.as_deref()) {
            predicates.push(Predicate::Location(location.to_string()));
        }
        if let Some(recruiter) = self.recruiter_id {
            predicates.push(Predicate::Recruiter(recruiter));
        }
        if let Some(source) = active_text(self.source.as_deref()) {
            predicates.push(Predicate::Source(source.to_string()));
        }
        if let Some(position) = active_text(self.position.as_deref()) {
            predicates.push(Predicate::Position(position.to_string()));
        }
        if let Some(date) = self.start_date {
            predicates.push(Predicate::CreatedOnOrAfter(date));
        }
        if let Some(date) = self.end_date {
            predicates.push(Predicate::CreatedOnOrBefore(date));
        }

        predicates
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }
}

fn active_text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// SQL function that lower-cases text with Unicode rules. SQLite's own
/// `lower()` and `LIKE` only fold ASCII letters.
pub const CASEFOLD_FN: &str = "casefold";

/// Wraps user text for a literal `LIKE ... ESCAPE '\'` match.
fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Case-insensitive substring test on one column. Both sides are folded, so
/// "émile" matches "ÉMILE".
fn contains(column: &str, text: &str, params: &mut Vec<Value>) -> String {
    params.push(Value::Text(like_pattern(&text.to_lowercase())));
    format!("{CASEFOLD_FN}({column}) LIKE ? ESCAPE '\\'")
}

fn date_value(date: NaiveDate) -> Value {
    Value::Text(date.format("%Y-%m-%d").to_string())
}

/// A compiled `WHERE` body and its positional parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledFilter {
    pub clause: String,
    pub params: Vec<Value>,
}

impl Predicate {
    fn compile(&self, params: &mut Vec<Value>) -> String {
        match self {
            Predicate::Text(text) => {
                let any = ["c.first_name", "c.last_name", "c.email", "c.skills"]
                    .map(|column| contains(column, text, params))
                    .join(" OR ");
                format!("({any})")
            }
            Predicate::Status(StatusFilter::One(status)) => {
                params.push(Value::Text(status.as_str().to_string()));
                "c.status = ?".to_string()
            }
            Predicate::Status(StatusFilter::AnyOf(statuses)) => {
                params.extend(
                    statuses
                        .iter()
                        .map(|s| Value::Text(s.as_str().to_string())),
                );
                let placeholders = vec!["?"; statuses.len()].join(", ");
                format!("c.status IN ({placeholders})")
            }
            Predicate::MinExperience(years) => {
                params.push(Value::Integer(*years));
                "c.years_of_experience >= ?".to_string()
            }
            Predicate::MaxExperience(years) => {
                params.push(Value::Integer(*years));
                "c.years_of_experience <= ?".to_string()
            }
            Predicate::Location(location) => contains("c.location", location, params),
            Predicate::Recruiter(RecruiterFilter::Assigned(id)) => {
                params.push(Value::Integer(*id));
                "c.recruiter_id = ?".to_string()
            }
            Predicate::Recruiter(RecruiterFilter::Unassigned) => "c.recruiter_id IS NULL".to_string(),
            Predicate::Source(source) => {
                params.push(Value::Text(source.clone()));
                "c.source = ?".to_string()
            }
            Predicate::Position(position) => contains("c.position_applied", position, params),
            Predicate::CreatedOnOrAfter(date) => {
                params.push(date_value(*date));
                "DATE(c.created_at) >= ?".to_string()
            }
            Predicate::CreatedOnOrBefore(date) => {
                params.push(date_value(*date));
                "DATE(c.created_at) <= ?".to_string()
            }
        }
    }
}

/// Joins predicates with `AND`. An empty slice yields an empty clause.
#[must_use]
pub fn compile(predicates: &[Predicate]) -> CompiledFilter {
    let mut params = Vec::new();
    let parts: Vec<String> = predicates.iter().map(|p| p.compile(&mut params)).collect();
    CompiledFilter {
        clause: parts.join(" AND "),
        params,
    }
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<Option<StatusFilter>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }

    let parse = |s: &str| -> Result<CandidateStatus, D::Error> {
        s.parse().map_err(de::Error::custom)
    };

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::One(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::One(s)) => Ok(Some(StatusFilter::One(parse(s.trim())?))),
        Some(Raw::Many(list)) => {
            let statuses = list
                .iter()
                .map(|s| parse(s.trim()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(StatusFilter::AnyOf(statuses)))
        }
    }
}

fn deserialize_recruiter<'de, D>(deserializer: D) -> Result<Option<RecruiterFilter>, D::Error>
where
    D: Deserializer<'de>,
{
    // Only called when the key is present, so `null` means "unassigned".
    Ok(Some(match Option::<i64>::deserialize(deserializer)? {
        Some(id) => RecruiterFilter::Assigned(id),
        None => RecruiterFilter::Unassigned,
    }))
}
