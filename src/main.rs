use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use recruitdesk::auth::Authenticator;
use recruitdesk::cli::{AdminCommands, NewUserArgs, UserCommands, load_config, run_admin_init, run_user_add};
use recruitdesk::clock::{Clock, SystemClock};
use recruitdesk::server::{AppState, create_router};
use recruitdesk::store::{SqliteStore, Store};

#[derive(Parser)]
#[command(name = "recruitdesk")]
#[command(about = "A recruitment tracking server", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, short)]
        port: Option<u16>,

        /// Data directory for the database
        #[arg(long)]
        data_dir: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("recruitdesk=info".parse()?))
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init { data_dir } => {
                run_admin_init(&load_config(config_path, data_dir)?)?;
            }
            AdminCommands::User { command } => match command {
                UserCommands::Add {
                    data_dir,
                    username,
                    email,
                    full_name,
                    role,
                    password,
                    non_interactive,
                } => {
                    let config = load_config(config_path, data_dir)?;
                    run_user_add(
                        &config,
                        NewUserArgs {
                            username,
                            email,
                            full_name,
                            role,
                            password,
                            non_interactive,
                        },
                    )?;
                }
            },
        },
        Commands::Serve {
            host,
            port,
            data_dir,
        } => {
            let mut config = load_config(config_path, data_dir)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            fs::create_dir_all(&config.server.data_dir)?;
            let store: Arc<dyn Store> = Arc::new(SqliteStore::new(config.server.db_path())?);
            store.initialize()?;

            let clock: Arc<dyn Clock> = Arc::new(SystemClock);
            if let Some(admin) =
                Authenticator::new(store.clone(), clock.clone()).bootstrap_admin(&config.bootstrap)?
            {
                info!("Created bootstrap admin '{}'", admin.username);
            }

            let addr = config.server.socket_addr()?;
            let state = Arc::new(AppState::new(store, clock, config));
            let app = create_router(state);

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
