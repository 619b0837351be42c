use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::types::{Permission, User};

const TOKEN_PREFIX: &str = "rd";
const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    Authenticated {
        user: User,
        login_time: DateTime<Utc>,
    },
}

/// One client's authentication state. The user is a snapshot taken at login,
/// so role changes apply from the next login.
#[derive(Clone)]
pub struct Session {
    state: SessionState,
    timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        Self {
            state: SessionState::Anonymous,
            timeout,
            clock,
        }
    }

    pub fn login(&mut self, user: User) {
        self.state = SessionState::Authenticated {
            user,
            login_time: self.clock.now(),
        };
    }

    pub fn logout(&mut self) {
        self.state = SessionState::Anonymous;
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated { user, .. } => Some(user),
            SessionState::Anonymous => None,
        }
    }

    #[must_use]
    pub fn login_time(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            SessionState::Authenticated { login_time, .. } => Some(*login_time),
            SessionState::Anonymous => None,
        }
    }

    /// Logs the session out and returns true once it has been authenticated
    /// for longer than the timeout. Anonymous sessions never expire.
    pub fn check_session_timeout(&mut self) -> bool {
        let Some(login_time) = self.login_time() else {
            return false;
        };

        if self.clock.now() - login_time > self.timeout {
            self.logout();
            return true;
        }
        false
    }

    /// The current user, provided their role grants `permission`.
    pub fn authorize(&self, permission: Permission) -> Result<&User> {
        let user = self.current_user().ok_or(Error::Unauthorized)?;
        if !user.role.can(permission) {
            return Err(Error::Forbidden);
        }
        Ok(user)
    }
}

/// Live sessions keyed by opaque bearer token.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Session>>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl SessionRegistry {
    pub fn new(clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            clock,
            timeout,
        }
    }

    fn sessions(&self) -> std::sync::MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Starts an authenticated session for `user` and returns its token.
    pub fn open(&self, user: User) -> String {
        let mut session = Session::new(self.clock.clone(), self.timeout);
        session.login(user);

        let token = generate_token();
        let mut sessions = self.sessions();
        sessions.retain(|_, s| !s.check_session_timeout());
        sessions.insert(token.clone(), session);
        token
    }

    /// Looks up the session for `token`, expiring it first when due.
    pub fn resolve(&self, token: &str) -> Result<Session> {
        let mut sessions = self.sessions();
        let session = sessions.get_mut(token).ok_or(Error::Unauthorized)?;

        if session.check_session_timeout() {
            sessions.remove(token);
            tracing::info!("session expired");
            return Err(Error::SessionExpired);
        }

        Ok(session.clone())
    }

    /// Ends the session. Returns false for unknown tokens.
    pub fn close(&self, token: &str) -> bool {
        self.sessions().remove(token).is_some()
    }

    /// Ends every session belonging to `user_id`.
    pub fn close_user(&self, user_id: i64) -> usize {
        let mut sessions = self.sessions();
        let before = sessions.len();
        sessions.retain(|_, s| s.current_user().is_none_or(|u| u.id != user_id));
        before - sessions.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds a token of the form `rd_<64 hex chars>`.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill(&mut bytes);
    format!("{TOKEN_PREFIX}_{}", hex::encode(bytes))
}
