mod admin;
mod auth;
mod candidates;
pub mod dto;
mod interactions;
pub mod response;
mod router;
mod views;

pub use admin::admin_router;
pub use auth::auth_router;
pub use candidates::candidate_router;
pub use interactions::interaction_router;
pub use router::{AppState, create_router};
pub use views::views_router;
