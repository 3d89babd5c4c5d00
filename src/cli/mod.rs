//! CLI module for the user directory
//!
//! Loads seed users into a fresh directory and runs one operation against it:
//! - `list`: all users in insertion order
//! - `map`: users keyed by ID
//! - `login`: credential lookup under the configured deadline
//! - `delete`: delete through the DAO

pub mod commands;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::DomainError;
use crate::infrastructure::logging;
use crate::infrastructure::user::{default_users, load_seed, InMemoryUserDao, UserDirectory};

/// User directory - in-memory user registry
#[derive(Parser)]
#[command(name = "user-directory")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML seed file with `[[users]]` (overrides config)
    #[arg(long, global = true)]
    pub seed: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Print all users as JSON
    List,

    /// Print users keyed by ID as JSON
    Map,

    /// Look up a user by username and password
    Login(LoginArgs),

    /// Delete a user by ID
    Delete {
        /// ID of the user to delete
        id: i64,
    },
}

/// Arguments for the login command
#[derive(Args, Debug, Clone, PartialEq)]
pub struct LoginArgs {
    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub password: Option<String>,
}

/// Build a seeded directory and execute the parsed command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let seed = seed_path(cli.seed.as_deref(), &config);
    let mut directory = build_directory(seed)?;

    let mut out = std::io::stdout().lock();
    commands::execute(
        &mut directory,
        cli.command,
        config.directory.login_timeout(),
        &mut out,
    )
    .await
}

/// Seed file from the command line, else from config
fn seed_path<'a>(cli_seed: Option<&'a Path>, config: &'a AppConfig) -> Option<&'a Path> {
    cli_seed.or(config.directory.seed_file.as_deref())
}

/// Load seed users into a fresh directory backed by an in-memory DAO
pub fn build_directory(
    seed: Option<&Path>,
) -> Result<UserDirectory<InMemoryUserDao>, DomainError> {
    let users = match seed {
        Some(path) => load_seed(path)?,
        None => default_users(),
    };
    info!(count = users.len(), "Loaded seed users");

    let dao = Arc::new(InMemoryUserDao::with_users(&users));
    let mut directory = UserDirectory::new(dao);
    directory.add(users)?;

    Ok(directory)
}
