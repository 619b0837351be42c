use std::fs;
use std::sync::Arc;

use crate::auth::Authenticator;
use crate::clock::SystemClock;
use crate::config::AppConfig;
use crate::store::{SqliteStore, Store};

/// Creates the schema and seeds the bootstrap administrator. Fails when the
/// database already has users.
pub fn run_admin_init(config: &AppConfig) -> anyhow::Result<()> {
    fs::create_dir_all(&config.server.data_dir)?;

    let db_path = config.server.db_path();
    let store = Arc::new(SqliteStore::new(&db_path)?);
    store.initialize()?;

    let authenticator = Authenticator::new(store, Arc::new(SystemClock));
    let Some(admin) = authenticator.bootstrap_admin(&config.bootstrap)? else {
        anyhow::bail!(
            "Already initialized. Users exist in {}",
            db_path.display()
        );
    };

    println!();
    println!("========================================");
    println!("Database created at {}", db_path.display());
    println!();
    println!("  Admin username: {}", admin.username);
    println!("  Admin email:    {}", admin.email);
    println!();
    println!("Log in and change the password before inviting users.");
    println!("========================================");
    println!();

    Ok(())
}
