use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireSession;
use crate::server::AppState;
use crate::server::dto::{CreateUserRequest, ListUsersParams, UpdateRoleRequest};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::types::{Permission, Role};

pub async fn create_user(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> impl IntoResponse {
    auth.authorize(Permission::MANAGE_USERS)?;

    let user = state
        .authenticator
        .create_user(&req.username, &req.email, &req.password, &req.full_name, &req.role)
        .api_err("Failed to create user")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

pub async fn list_users(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListUsersParams>,
) -> impl IntoResponse {
    auth.authorize(Permission::MANAGE_USERS)?;

    let users = state
        .store
        .list_users(params.include_inactive)
        .api_err("Failed to list users")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(users)))
}

pub async fn get_user(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    auth.authorize(Permission::MANAGE_USERS)?;

    let user = state
        .store
        .get_user(id)
        .api_err("Failed to get user")?
        .or_not_found("User not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(user)))
}

/// Ends the user's open sessions, so the new role applies from their next login.
pub async fn update_role(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateRoleRequest>,
) -> impl IntoResponse {
    let admin = auth.authorize(Permission::MANAGE_USERS)?;
    let role: Role = req.role.parse()?;

    state
        .store
        .update_user_role(id, role, state.clock.now())
        .api_err("Failed to update role")?;

    let user = state
        .store
        .get_user(id)
        .api_err("Failed to get user")?
        .or_not_found("User not found")?;

    state.sessions.close_user(id);
    tracing::info!(user_id = id, role = %role, changed_by = admin.id, "user role changed");

    Ok::<_, ApiError>(Json(ApiResponse::success(user)))
}

/// Deactivating a user also ends their open sessions.
pub async fn toggle_active(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let admin = auth.authorize(Permission::MANAGE_USERS)?;

    if id == admin.id {
        return Err(ApiError::bad_request("Cannot deactivate your own account"));
    }

    state
        .store
        .toggle_user_active(id, state.clock.now())
        .api_err("Failed to toggle user")?;

    let user = state
        .store
        .get_user(id)
        .api_err("Failed to get user")?
        .or_not_found("User not found")?;

    if !user.is_active {
        state.sessions.close_user(id);
    }

    tracing::info!(user_id = id, is_active = user.is_active, changed_by = admin.id, "user active flag toggled");

    Ok::<_, ApiError>(Json(ApiResponse::success(user)))
}

/// Hard delete. Candidates and interactions keep pointing at the removed id.
pub async fn delete_user(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let admin = auth.authorize(Permission::MANAGE_USERS)?;

    if id == admin.id {
        return Err(ApiError::bad_request("Cannot delete your own account"));
    }

    let deleted = state.store.delete_user(id).api_err("Failed to delete user")?;
    if !deleted {
        return Err(ApiError::not_found("User not found"));
    }

    state.sessions.close_user(id);
    tracing::info!(user_id = id, deleted_by = admin.id, "user deleted");

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
