//! # Recruitdesk
//!
//! A recruitment tracking server: candidates, logged interactions, role-based
//! access and recruiter performance views. Usable both as a standalone binary
//! and as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! recruitdesk = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use recruitdesk::clock::SystemClock;
//! use recruitdesk::config::AppConfig;
//! use recruitdesk::server::{AppState, create_router};
//! use recruitdesk::store::{SqliteStore, Store};
//!
//! let config = AppConfig::default();
//! let store = SqliteStore::new(config.server.db_path()).unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store), Arc::new(SystemClock), config));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes CLI module. Disable with `default-features = false`.

pub mod analytics;
pub mod auth;
#[cfg(feature = "cli")]
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod server;
pub mod store;
pub mod types;
pub mod validation;
