use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};

use crate::analytics::check_recruiter_target;
use crate::auth::RequireSession;
use crate::server::AppState;
use crate::server::dto::StatusUpdateRequest;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::store::CandidateFilter;
use crate::types::{CandidateInput, NewCandidate, Permission};
use crate::validation::validate_candidate;

pub fn candidate_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/candidates", get(list_candidates).post(create_candidate))
        .route("/candidates/search", post(search_candidates))
        .route("/candidates/statistics", get(statistics))
        .route(
            "/candidates/{id}",
            get(get_candidate).put(update_candidate).delete(delete_candidate),
        )
        .route("/candidates/{id}/status", patch(update_status))
        .route("/candidates/{id}/interactions", get(list_candidate_interactions))
}

pub async fn list_candidates(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    auth.authorize(Permission::VIEW)?;

    let candidates = state
        .store
        .list_candidates()
        .api_err("Failed to list candidates")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(candidates)))
}

pub async fn search_candidates(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Json(filter): Json<CandidateFilter>,
) -> impl IntoResponse {
    auth.authorize(Permission::VIEW)?;

    let candidates = state
        .store
        .search_candidates(&filter)
        .api_err("Failed to search candidates")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(candidates)))
}

pub async fn statistics(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    auth.authorize(Permission::VIEW)?;

    let stats = state
        .store
        .candidate_statistics(state.clock.today())
        .api_err("Failed to compute statistics")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(stats)))
}

pub async fn create_candidate(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Json(input): Json<CandidateInput>,
) -> impl IntoResponse {
    let user = auth.authorize(Permission::CREATE)?;
    validate_candidate(&input).map_err(ApiError::validation)?;
    check_recruiter_target(state.store.as_ref(), input.recruiter_id)
        .api_err("Failed to check recruiter")?;

    let id = state
        .store
        .create_candidate(&NewCandidate {
            input,
            created_by: Some(user.id),
            created_at: state.clock.now(),
        })
        .api_err("Failed to create candidate")?;

    let candidate = state
        .store
        .get_candidate(id)
        .api_err("Failed to get candidate")?
        .or_not_found("Candidate not found")?;

    tracing::info!(candidate_id = id, created_by = user.id, "candidate created");

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(candidate))))
}

pub async fn get_candidate(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    auth.authorize(Permission::VIEW)?;

    let candidate = state
        .store
        .get_candidate(id)
        .api_err("Failed to get candidate")?
        .or_not_found("Candidate not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(candidate)))
}

pub async fn update_candidate(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<CandidateInput>,
) -> impl IntoResponse {
    auth.authorize(Permission::EDIT)?;
    validate_candidate(&input).map_err(ApiError::validation)?;

    let existing = state
        .store
        .get_candidate(id)
        .api_err("Failed to get candidate")?
        .or_not_found("Candidate not found")?;

    // An unchanged assignment is kept even if that user is gone.
    if input.recruiter_id != existing.recruiter_id {
        check_recruiter_target(state.store.as_ref(), input.recruiter_id)
            .api_err("Failed to check recruiter")?;
    }

    state
        .store
        .update_candidate(id, &input, state.clock.now())
        .api_err("Failed to update candidate")?;

    let candidate = state
        .store
        .get_candidate(id)
        .api_err("Failed to get candidate")?
        .or_not_found("Candidate not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(candidate)))
}

pub async fn update_status(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<StatusUpdateRequest>,
) -> impl IntoResponse {
    auth.authorize(Permission::EDIT)?;

    state
        .store
        .update_candidate_status(id, req.status, state.clock.now())
        .api_err("Failed to update status")?;

    let candidate = state
        .store
        .get_candidate(id)
        .api_err("Failed to get candidate")?
        .or_not_found("Candidate not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(candidate)))
}

pub async fn delete_candidate(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let user = auth.authorize(Permission::DELETE)?;

    let deleted = state
        .store
        .delete_candidate(id)
        .api_err("Failed to delete candidate")?;

    if !deleted {
        return Err(ApiError::not_found("Candidate not found"));
    }

    tracing::info!(candidate_id = id, deleted_by = user.id, "candidate deleted");

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn list_candidate_interactions(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    auth.authorize(Permission::VIEW)?;

    state
        .store
        .get_candidate(id)
        .api_err("Failed to get candidate")?
        .or_not_found("Candidate not found")?;

    let interactions = state
        .store
        .list_candidate_interactions(id)
        .api_err("Failed to list interactions")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(interactions)))
}
