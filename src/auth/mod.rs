mod authenticator;
mod middleware;
mod password;
mod session;

pub use authenticator::Authenticator;
pub use middleware::{AuthError, RequireSession};
pub use password::PasswordManager;
pub use session::{Session, SessionRegistry, SessionState};

pub use crate::types::check_permission;
