use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::analytics;
use crate::auth::RequireSession;
use crate::server::AppState;
use crate::server::dto::{AssignRecruiterRequest, ReassignRequest};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::types::Permission;

pub async fn assign_recruiter(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<AssignRecruiterRequest>,
) -> impl IntoResponse {
    auth.authorize(Permission::MANAGE_USERS)?;
    let Some(target) = req.recruiter_id else {
        return Err(ApiError::bad_request("recruiter_id is required; use null to unassign"));
    };

    analytics::reassign_candidate(state.store.as_ref(), id, target, state.clock.now())
        .api_err("Failed to reassign candidate")?;

    let candidate = state
        .store
        .get_candidate(id)
        .api_err("Failed to get candidate")?
        .or_not_found("Candidate not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(candidate)))
}

/// Bulk reassignment. Responds 200 with per-candidate counts even when some
/// writes fail.
pub async fn reassign(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReassignRequest>,
) -> impl IntoResponse {
    let admin = auth.authorize(Permission::MANAGE_USERS)?;
    let store = state.store.as_ref();
    let now = state.clock.now();
    let Some(target) = req.to_recruiter_id else {
        return Err(ApiError::bad_request("to_recruiter_id is required; use null to unassign"));
    };

    let outcome = match (req.candidate_ids, req.from_recruiter_id) {
        (Some(ids), None) => analytics::reassign_candidates(store, &ids, target, now),
        (None, Some(from)) => analytics::reassign_from(store, from, target, now),
        _ => {
            return Err(ApiError::bad_request(
                "Provide exactly one of candidate_ids or from_recruiter_id",
            ));
        }
    }
    .api_err("Failed to reassign candidates")?;

    tracing::info!(
        requested_by = admin.id,
        succeeded = outcome.succeeded,
        attempted = outcome.attempted,
        "reassignment requested"
    );

    Ok::<_, ApiError>(Json(ApiResponse::success(outcome)))
}
