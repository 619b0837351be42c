use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::auth::RequireSession;
use crate::server::AppState;
use crate::server::dto::ListInteractionsParams;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::types::{InteractionInput, NewInteraction, Permission};
use crate::validation::validate_interaction;

pub fn interaction_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/interactions", get(list_interactions).post(create_interaction))
        .route("/interactions/followups", get(upcoming_followups))
        .route(
            "/interactions/{id}",
            get(get_interaction).delete(delete_interaction),
        )
}

pub async fn list_interactions(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListInteractionsParams>,
) -> impl IntoResponse {
    auth.authorize(Permission::VIEW)?;

    if params.limit.is_some_and(|l| l < 0) {
        return Err(ApiError::bad_request("limit cannot be negative"));
    }

    let interactions = state
        .store
        .list_interactions(params.limit)
        .api_err("Failed to list interactions")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(interactions)))
}

pub async fn create_interaction(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Json(input): Json<InteractionInput>,
) -> impl IntoResponse {
    let user = auth.authorize(Permission::CREATE)?;
    validate_interaction(&input).map_err(ApiError::validation)?;

    state
        .store
        .get_candidate(input.candidate_id)
        .api_err("Failed to get candidate")?
        .or_not_found("Candidate not found")?;

    let now = state.clock.now();
    let id = state
        .store
        .create_interaction(&NewInteraction {
            candidate_id: input.candidate_id,
            recruiter_id: user.id,
            call_date: input.call_date.unwrap_or(now),
            call_type: input.call_type,
            duration: input.duration,
            outcome: input.outcome,
            notes: input.notes,
            next_action: input.next_action,
            next_action_date: input.next_action_date,
            created_at: now,
        })
        .api_err("Failed to log interaction")?;

    let interaction = state
        .store
        .get_interaction(id)
        .api_err("Failed to get interaction")?
        .or_not_found("Interaction not found")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(interaction))))
}

pub async fn upcoming_followups(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    auth.authorize(Permission::VIEW)?;

    let followups = state
        .store
        .upcoming_followups(state.clock.today())
        .api_err("Failed to list follow-ups")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(followups)))
}

pub async fn get_interaction(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    auth.authorize(Permission::VIEW)?;

    let interaction = state
        .store
        .get_interaction(id)
        .api_err("Failed to get interaction")?
        .or_not_found("Interaction not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(interaction)))
}

pub async fn delete_interaction(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    auth.authorize(Permission::DELETE)?;

    let deleted = state
        .store
        .delete_interaction(id)
        .api_err("Failed to delete interaction")?;

    if !deleted {
        return Err(ApiError::not_found("Interaction not found"));
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
