mod candidates;
mod users;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::server::AppState;

/// Routes that require the `manage_users` permission.
pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        // User routes
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}", get(users::get_user).delete(users::delete_user))
        .route("/users/{id}/role", patch(users::update_role))
        .route("/users/{id}/toggle-active", post(users::toggle_active))
        // Candidate ownership routes
        .route("/candidates/{id}/recruiter", put(candidates::assign_recruiter))
        .route("/candidates/reassign", post(candidates::reassign))
}
