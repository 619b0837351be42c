use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, header::AUTHORIZATION, header::WWW_AUTHENTICATE, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::Session;
use crate::error::{Error, Result};
use crate::server::AppState;
use crate::types::{Permission, User};

/// Extractor that requires a live session. Expiry is checked before the
/// handler runs.
pub struct RequireSession {
    pub token: String,
    pub user: User,
    pub session: Session,
}

impl RequireSession {
    /// The session user, provided their role grants `permission`.
    pub fn authorize(&self, permission: Permission) -> Result<&User> {
        self.session.authorize(permission)
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingAuth,
    InvalidScheme,
    InvalidSession,
    SessionExpired,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingAuth => "Authentication required",
            AuthError::InvalidScheme => "Invalid authorization scheme",
            AuthError::InvalidSession => "Invalid session",
            AuthError::SessionExpired => "Session expired, please log in again",
        };

        let body = json!({ "data": null, "error": message });

        let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
        response.headers_mut().insert(
            WWW_AUTHENTICATE,
            HeaderValue::from_static("Bearer realm=\"recruitdesk\""),
        );

        response
    }
}

impl FromRequestParts<Arc<AppState>> for RequireSession {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> std::result::Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = extract_bearer_token(auth_header)?.ok_or(AuthError::MissingAuth)?;

        let session = state.sessions.resolve(&token).map_err(|e| match e {
            Error::SessionExpired => AuthError::SessionExpired,
            _ => AuthError::InvalidSession,
        })?;

        let user = session
            .current_user()
            .cloned()
            .ok_or(AuthError::InvalidSession)?;

        Ok(RequireSession {
            token,
            user,
            session,
        })
    }
}

/// Returns None when no header is present and an error for any scheme other
/// than Bearer.
fn extract_bearer_token(auth_header: Option<&str>) -> std::result::Result<Option<String>, AuthError> {
    match auth_header {
        Some(header) => header
            .strip_prefix("Bearer ")
            .map(|token| Some(token.trim().to_string()))
            .ok_or(AuthError::InvalidScheme),
        None => Ok(None),
    }
}
