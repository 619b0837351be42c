use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{CandidateStatus, InteractionType, Role};

/// A user as seen outside the credential boundary. Carries no password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user row together with its stored password hash. Only the store and the
/// authenticator handle this type.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Editable candidate fields, used both for creation and for full replacement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    pub current_role: Option<String>,
    pub current_company: Option<String>,
    pub years_of_experience: Option<i64>,
    pub skills: Option<String>,
    pub education: Option<String>,
    pub status: CandidateStatus,
    pub position_applied: Option<String>,
    pub recruiter_id: Option<i64>,
    pub source: Option<String>,
    pub salary_expectation: Option<String>,
    pub notice_period: Option<String>,
    pub resume_url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub input: CandidateInput,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Every field is always serialized so exported rows share the same keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    pub current_role: Option<String>,
    pub current_company: Option<String>,
    pub years_of_experience: Option<i64>,
    pub skills: Option<String>,
    pub education: Option<String>,
    pub status: CandidateStatus,
    pub position_applied: Option<String>,
    pub recruiter_id: Option<i64>,
    pub recruiter_name: Option<String>,
    pub source: Option<String>,
    pub salary_expectation: Option<String>,
    pub notice_period: Option<String>,
    pub resume_url: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionInput {
    pub candidate_id: i64,
    #[serde(default)]
    pub call_date: Option<DateTime<Utc>>,
    pub call_type: Option<InteractionType>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub next_action: Option<String>,
    #[serde(default)]
    pub next_action_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewInteraction {
    pub candidate_id: i64,
    pub recruiter_id: i64,
    pub call_date: DateTime<Utc>,
    pub call_type: Option<InteractionType>,
    pub duration: Option<i64>,
    pub outcome: Option<String>,
    pub notes: Option<String>,
    pub next_action: Option<String>,
    pub next_action_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: i64,
    pub candidate_id: i64,
    pub recruiter_id: i64,
    pub call_date: DateTime<Utc>,
    pub call_type: Option<InteractionType>,
    pub duration: Option<i64>,
    pub outcome: Option<String>,
    pub notes: Option<String>,
    pub next_action: Option<String>,
    pub next_action_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub recruiter_name: Option<String>,
    pub candidate_name: Option<String>,
    pub candidate_email: Option<String>,
}

/// One bucket of an ordered group-by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

/// Dashboard aggregates over the candidate set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total: i64,
    /// Only statuses that occur, in pipeline order.
    pub by_status: BTreeMap<CandidateStatus, i64>,
    /// Count descending.
    pub by_source: Vec<LabelCount>,
    /// Count descending.
    pub by_recruiter: Vec<LabelCount>,
    /// Created within the trailing seven days.
    pub recent: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub recruiter_id: i64,
    pub recruiter_name: String,
    pub total: i64,
    pub hired: i64,
    pub interview: i64,
    pub offer: i64,
    pub rejected: i64,
    pub success_rate: f64,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignFailure {
    pub candidate_id: i64,
    pub reason: String,
}

/// Result of a non-transactional bulk reassignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignmentOutcome {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: Vec<ReassignFailure>,
}

impl ReassignmentOutcome {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.succeeded == self.attempted
    }
}
