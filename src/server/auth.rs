use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, patch, post},
};

use crate::auth::{RequireSession, check_permission};
use crate::server::AppState;
use crate::server::dto::{
    ChangePasswordRequest, LoginRequest, LoginResponse, PermissionResponse, UpdateProfileRequest,
};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};

pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/auth/password", post(change_password))
        .route("/auth/profile", patch(update_profile))
        .route("/auth/permissions/{action}", get(permission))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let user = state
        .authenticator
        .login(&req.username, &req.password)
        .api_err("Failed to log in")?;

    let expires_at = state.clock.now() + state.config.session.timeout();
    let token = state.sessions.open(user.clone());

    Ok::<_, ApiError>(Json(ApiResponse::success(LoginResponse {
        token,
        user,
        expires_at,
    })))
}

pub async fn logout(auth: RequireSession, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.sessions.close(&auth.token);
    tracing::info!(user_id = auth.user.id, username = %auth.user.username, "logged out");

    Json(ApiResponse::success("Logged out"))
}

pub async fn me(auth: RequireSession) -> impl IntoResponse {
    Json(ApiResponse::success(auth.user))
}

pub async fn change_password(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChangePasswordRequest>,
) -> impl IntoResponse {
    state
        .authenticator
        .change_password(auth.user.id, &req.old_password, &req.new_password)
        .api_err("Failed to change password")?;

    Ok::<_, ApiError>(Json(ApiResponse::success("Password changed")))
}

pub async fn update_profile(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    let user = state
        .authenticator
        .update_profile(auth.user.id, &req.full_name, &req.email)
        .api_err("Failed to update profile")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(user)))
}

pub async fn permission(auth: RequireSession, Path(action): Path<String>) -> impl IntoResponse {
    let role = auth.user.role.as_str();

    Json(ApiResponse::success(PermissionResponse {
        role: role.to_string(),
        allowed: check_permission(role, &action),
        action,
    }))
}
