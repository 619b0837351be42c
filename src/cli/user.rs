use std::sync::Arc;

use inquire::{Password, PasswordDisplayMode, Select, Text};

use crate::auth::Authenticator;
use crate::clock::SystemClock;
use crate::config::AppConfig;
use crate::types::Role;
use crate::validation::MIN_PASSWORD_LEN;

use super::init_store;

pub struct NewUserArgs {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: String,
    pub password: Option<String>,
    pub non_interactive: bool,
}

fn value_or_prompt(value: Option<String>, label: &str, flag: &str, non_interactive: bool) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None if non_interactive => anyhow::bail!("--{flag} is required in non-interactive mode"),
        None => Ok(Text::new(label)
            .with_validator(|input: &str| {
                if input.trim().is_empty() {
                    Ok(inquire::validator::Validation::Invalid("Value cannot be empty".into()))
                } else {
                    Ok(inquire::validator::Validation::Valid)
                }
            })
            .prompt()?),
    }
}

pub fn run_user_add(config: &AppConfig, args: NewUserArgs) -> anyhow::Result<()> {
    let store = Arc::new(init_store(config)?);
    let ni = args.non_interactive;

    let username = value_or_prompt(args.username, "Username:", "username", ni)?;
    let email = value_or_prompt(args.email, "Email:", "email", ni)?;
    let full_name = value_or_prompt(args.full_name, "Full name:", "full-name", ni)?;

    let role = if ni || args.role.parse::<Role>().is_ok() {
        args.role
    } else {
        let names: Vec<&str> = Role::ALL.iter().map(|r| r.as_str()).collect();
        Select::new("Role:", names).prompt()?.to_string()
    };

    let password = match args.password {
        Some(password) => password,
        None if ni => anyhow::bail!("--password is required in non-interactive mode"),
        None => Password::new("Password:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .with_validator(|input: &str| {
                if input.chars().count() < MIN_PASSWORD_LEN {
                    Ok(inquire::validator::Validation::Invalid(
                        format!("Password must be at least {MIN_PASSWORD_LEN} characters long").into(),
                    ))
                } else {
                    Ok(inquire::validator::Validation::Valid)
                }
            })
            .prompt()?,
    };

    let authenticator = Authenticator::new(store, Arc::new(SystemClock));
    let user = authenticator.create_user(&username, &email, &password, &full_name, &role)?;

    println!();
    println!("Created {} \"{}\" (id {})", user.role, user.username, user.id);

    Ok(())
}
