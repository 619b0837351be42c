use std::sync::Arc;

use super::PasswordManager;
use crate::clock::Clock;
use crate::config::BootstrapConfig;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{NewUser, Role, User};
use crate::validation::{validate_new_user, validate_password, validate_profile};

/// Credential checks and account lifecycle. Password hashes are read and
/// written here and nowhere else.
pub struct Authenticator {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    passwords: PasswordManager,
}

impl Authenticator {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            passwords: PasswordManager::new(),
        }
    }

    /// Returns the user when the account exists, is active and the password
    /// verifies. All three failures look the same to the caller.
    pub fn login(&self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();

        let Some(stored) = self.store.get_stored_user(username)? else {
            tracing::info!(username, "login rejected: unknown user");
            return Err(Error::AuthFailure);
        };

        if !stored.user.is_active {
            tracing::info!(username, user_id = stored.user.id, "login rejected: inactive account");
            return Err(Error::AuthFailure);
        }

        let verified = match self.passwords.verify(password, &stored.password_hash) {
            Ok(verified) => verified,
            Err(e) => {
                tracing::warn!(user_id = stored.user.id, "stored password hash unusable: {e}");
                false
            }
        };
        if !verified {
            tracing::info!(username, user_id = stored.user.id, "login rejected: wrong password");
            return Err(Error::AuthFailure);
        }

        tracing::info!(username, user_id = stored.user.id, role = %stored.user.role, "login succeeded");
        Ok(stored.user)
    }

    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        full_name: &str,
        role: &str,
    ) -> Result<User> {
        let role: Role = role.parse()?;
        validate_new_user(username, email, password, full_name)?;

        let password_hash = self.passwords.hash(password)?;
        let user = self.store.create_user(&NewUser {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password_hash,
            full_name: full_name.trim().to_string(),
            role,
            created_at: self.clock.now(),
        })?;

        tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "user created");
        Ok(user)
    }

    /// Replaces the hash after checking the current password.
    pub fn change_password(&self, user_id: i64, old_password: &str, new_password: &str) -> Result<()> {
        let hash = self
            .store
            .get_password_hash(user_id)?
            .ok_or(Error::NotFound)?;

        if !self.passwords.verify(old_password, &hash)? {
            tracing::info!(user_id, "password change rejected: current password mismatch");
            return Err(Error::AuthFailure);
        }
        validate_password(new_password)?;

        let new_hash = self.passwords.hash(new_password)?;
        self.store
            .update_password_hash(user_id, &new_hash, self.clock.now())?;

        tracing::info!(user_id, "password changed");
        Ok(())
    }

    pub fn update_profile(&self, user_id: i64, full_name: &str, email: &str) -> Result<User> {
        validate_profile(full_name, email)?;
        self.store
            .update_user_profile(user_id, full_name.trim(), email.trim(), self.clock.now())?;
        self.store.get_user(user_id)?.ok_or(Error::NotFound)
    }

    /// Seeds the configured administrator into an empty user table.
    pub fn bootstrap_admin(&self, config: &BootstrapConfig) -> Result<Option<User>> {
        if self.store.count_users()? > 0 {
            return Ok(None);
        }

        let user = self.create_user(
            &config.username,
            &config.email,
            &config.password,
            &config.full_name,
            Role::Admin.as_str(),
        )?;

        if config.password == BootstrapConfig::default().password {
            tracing::warn!(
                username = %user.username,
                "bootstrap admin uses the default password; change it after first login"
            );
        }
        Ok(Some(user))
    }
}
