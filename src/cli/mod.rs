mod commands;
mod init;
mod user;

pub use commands::{AdminCommands, UserCommands};
pub use init::run_admin_init;
pub use user::{NewUserArgs, run_user_add};

use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::store::SqliteStore;

/// Reads the config file when given; defaults otherwise. A `data_dir` flag
/// overrides the file.
pub fn load_config(path: Option<&Path>, data_dir: Option<String>) -> anyhow::Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::load(path)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {e}", path.display()))?,
        None => AppConfig::default(),
    };

    if let Some(data_dir) = data_dir {
        config.server.data_dir = PathBuf::from(data_dir);
    }

    Ok(config)
}

/// Opens an existing database, checking it has been initialized.
pub fn init_store(config: &AppConfig) -> anyhow::Result<SqliteStore> {
    let db_path = config.server.db_path();

    if !db_path.exists() {
        anyhow::bail!(
            "Database not found at {}. Run 'recruitdesk admin init' first.",
            db_path.display()
        );
    }

    SqliteStore::new(&db_path).map_err(Into::into)
}
