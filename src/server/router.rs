use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Router, routing::get};

use super::admin::admin_router;
use super::auth::auth_router;
use super::candidates::candidate_router;
use super::interactions::interaction_router;
use super::views::views_router;
use crate::auth::{Authenticator, SessionRegistry};
use crate::clock::Clock;
use crate::config::AppConfig;
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub authenticator: Authenticator,
    pub sessions: SessionRegistry,
    /// Shared by session expiry, follow-ups and statistics.
    pub clock: Arc<dyn Clock>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, config: AppConfig) -> Self {
        Self {
            authenticator: Authenticator::new(store.clone(), clock.clone()),
            sessions: SessionRegistry::new(clock.clone(), config.session.timeout()),
            store,
            clock,
            config,
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1/admin", admin_router())
        .nest("/api/v1", auth_router())
        .nest("/api/v1", candidate_router())
        .nest("/api/v1", interaction_router())
        .nest("/api/v1", views_router())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
