use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::get,
};

use crate::analytics;
use crate::auth::RequireSession;
use crate::export;
use crate::server::AppState;
use crate::server::dto::ExportResponse;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::types::Permission;

pub fn views_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recruiters", get(list_recruiters))
        .route("/leaderboard", get(leaderboard))
        .route("/export/candidates", get(export_candidates))
        .route("/export/interactions", get(export_interactions))
}

pub async fn list_recruiters(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    auth.authorize(Permission::VIEW)?;

    let recruiters = state
        .store
        .list_recruiters()
        .api_err("Failed to list recruiters")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(recruiters)))
}

pub async fn leaderboard(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    auth.authorize(Permission::VIEW)?;

    let entries =
        analytics::leaderboard(state.store.as_ref()).api_err("Failed to build leaderboard")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(entries)))
}

pub async fn export_candidates(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let user = auth.authorize(Permission::EXPORT)?;

    let candidates = state
        .store
        .list_candidates()
        .api_err("Failed to list candidates")?;
    let table = export::records(&candidates).api_err("Failed to export candidates")?;

    tracing::info!(user_id = user.id, rows = table.len(), "candidates exported");

    Ok::<_, ApiError>(Json(ApiResponse::success(ExportResponse {
        filename: export::filename("candidates", "csv", state.clock.now()),
        table,
    })))
}

pub async fn export_interactions(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let user = auth.authorize(Permission::EXPORT)?;

    let interactions = state
        .store
        .list_interactions(None)
        .api_err("Failed to list interactions")?;
    let table = export::records(&interactions).api_err("Failed to export interactions")?;

    tracing::info!(user_id = user.id, rows = table.len(), "interactions exported");

    Ok::<_, ApiError>(Json(ApiResponse::success(ExportResponse {
        filename: export::filename("call_history", "csv", state.clock.now()),
        table,
    })))
}
