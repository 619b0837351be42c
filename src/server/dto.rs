use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::export::ExportTable;
use crate::types::{CandidateStatus, User};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct PermissionResponse {
    pub role: String,
    pub action: String,
    pub allowed: bool,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: CandidateStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListInteractionsParams {
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListUsersParams {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

/// Outer `None`: key absent. `Some(None)`: explicit `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

/// `recruiter_id: null` unassigns. The key itself is required.
#[derive(Debug, Deserialize)]
pub struct AssignRecruiterRequest {
    #[serde(default, deserialize_with = "present")]
    pub recruiter_id: Option<Option<i64>>,
}

/// Either an explicit id list or every candidate of `from_recruiter_id`.
/// `to_recruiter_id` must be given; `null` unassigns.
#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    #[serde(default)]
    pub candidate_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub from_recruiter_id: Option<i64>,
    #[serde(default, deserialize_with = "present")]
    pub to_recruiter_id: Option<Option<i64>>,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub filename: String,
    #[serde(flatten)]
    pub table: ExportTable,
}
