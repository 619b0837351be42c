//! Startup configuration, read once from a TOML file.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! data_dir = "/var/lib/recruitdesk"
//!
//! [session]
//! timeout_hours = 24
//!
//! [bootstrap]
//! username = "admin"
//! password = "change-me-please"
//! ```
//!
//! Every key is optional.

mod server;

use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

pub use server::ServerConfig;

use crate::error::{Error, Result};

pub const DEFAULT_SESSION_TIMEOUT_HOURS: i64 = 24;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub bootstrap: BootstrapConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        if config.session.timeout_hours <= 0 {
            return Err(Error::Config(
                "session.timeout_hours must be positive".to_string(),
            ));
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub timeout_hours: i64,
}

impl SessionConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::hours(self.timeout_hours)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_hours: DEFAULT_SESSION_TIMEOUT_HOURS,
        }
    }
}

/// The administrator seeded into an empty user table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin123".to_string(),
            email: "admin@recruitdesk.local".to_string(),
            full_name: "System Administrator".to_string(),
        }
    }
}
