use clap::Subcommand;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Initialize the database and seed the bootstrap administrator
    Init {
        /// Data directory for the database
        #[arg(long)]
        data_dir: Option<String>,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Add a user account
    Add {
        /// Data directory for the database
        #[arg(long)]
        data_dir: Option<String>,

        /// Login name
        #[arg(long)]
        username: Option<String>,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Display name
        #[arg(long)]
        full_name: Option<String>,

        /// One of admin, recruiter, viewer
        #[arg(long, default_value = "recruiter")]
        role: String,

        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Fail instead of prompting for missing values
        #[arg(long)]
        non_interactive: bool,
    },
}
