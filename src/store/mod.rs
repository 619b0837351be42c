pub mod filter;
mod schema;
mod sqlite;

pub use filter::{CandidateFilter, Predicate, RecruiterFilter, StatusFilter};
pub use sqlite::SqliteStore;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // User operations
    fn create_user(&self, user: &NewUser) -> Result<User>;
    fn get_user(&self, id: i64) -> Result<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    /// The only read that returns a password hash.
    fn get_stored_user(&self, username: &str) -> Result<Option<StoredUser>>;
    fn get_password_hash(&self, id: i64) -> Result<Option<String>>;
    fn list_users(&self, include_inactive: bool) -> Result<Vec<User>>;
    /// Active admins and recruiters, ordered by full name.
    fn list_recruiters(&self) -> Result<Vec<User>>;
    fn count_users(&self) -> Result<i64>;
    fn update_user_profile(
        &self,
        id: i64,
        full_name: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<()>;
    fn update_user_role(&self, id: i64, role: Role, now: DateTime<Utc>) -> Result<()>;
    fn toggle_user_active(&self, id: i64, now: DateTime<Utc>) -> Result<()>;
    fn update_password_hash(&self, id: i64, hash: &str, now: DateTime<Utc>) -> Result<()>;
    /// Hard delete. Candidates and interactions keep their reference.
    fn delete_user(&self, id: i64) -> Result<bool>;

    // Candidate operations
    fn create_candidate(&self, candidate: &NewCandidate) -> Result<i64>;
    fn get_candidate(&self, id: i64) -> Result<Option<Candidate>>;
    /// All candidates, newest first.
    fn list_candidates(&self) -> Result<Vec<Candidate>>;
    /// Candidates matching every active clause of `filter`, newest first.
    fn search_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Candidate>>;
    fn update_candidate(&self, id: i64, input: &CandidateInput, now: DateTime<Utc>) -> Result<()>;
    fn update_candidate_status(
        &self,
        id: i64,
        status: CandidateStatus,
        now: DateTime<Utc>,
    ) -> Result<()>;
    fn set_candidate_recruiter(
        &self,
        id: i64,
        recruiter_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<()>;
    /// Also removes the candidate's interactions.
    fn delete_candidate(&self, id: i64) -> Result<bool>;
    fn candidate_statistics(&self, today: NaiveDate) -> Result<Statistics>;

    // Interaction operations
    fn create_interaction(&self, interaction: &NewInteraction) -> Result<i64>;
    fn get_interaction(&self, id: i64) -> Result<Option<Interaction>>;
    /// Most recent call first.
    fn list_interactions(&self, limit: Option<i64>) -> Result<Vec<Interaction>>;
    fn list_candidate_interactions(&self, candidate_id: i64) -> Result<Vec<Interaction>>;
    /// Interactions with a next action due on or after `today`, soonest first.
    fn upcoming_followups(&self, today: NaiveDate) -> Result<Vec<Interaction>>;
    fn delete_interaction(&self, id: i64) -> Result<bool>;

    fn close(&self) -> Result<()>;
}
