mod models;
mod permission;
mod status;

pub use models::*;
pub use permission::{Permission, Role, check_permission};
pub use status::{CandidateStatus, InteractionType, UnknownVariant};
