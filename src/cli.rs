//! Command line front end.
//!
//! Every command prints its result as JSON on stdout. Diagnostics go to the
//! log file and, for failures, to stderr from `main`.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use crate::api::{auth, Credentials, SimplenoteClient};
use crate::config::{Account, Config};
use crate::error::{AppError, Result};

#[derive(Parser, Debug)]
#[command(name = "simplenote", version)]
#[command(about = "Read and edit Simplenote notes from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "SIMPLENOTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Account email; defaults to the configured account
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Account password; defaults to the keyring entry
    #[arg(long, global = true, env = "SIMPLENOTE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Log debug output, including every API request
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Verify credentials and store the password in the keyring
    Login {
        /// Also record the account as the default in the config file
        #[arg(long)]
        save: bool,
    },
    /// Forget the stored password
    Logout,
    /// List note summaries
    List {
        /// Only notes modified since this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,
        /// Only notes carrying one of these tags
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Print a note
    Get {
        key: String,
        /// Fetch a specific version
        #[arg(long = "note-version")]
        version: Option<u64>,
    },
    /// Create a note
    Add { content: String },
    /// Move a note to the trash
    Trash { key: String },
    /// Permanently delete a note
    Delete { key: String },
}

impl Commands {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Login { .. } => "login",
            Commands::Logout => "logout",
            Commands::List { .. } => "list",
            Commands::Get { .. } => "get",
            Commands::Add { .. } => "add",
            Commands::Trash { .. } => "trash",
            Commands::Delete { .. } => "delete",
        }
    }
}

/// Execute a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let account = config.resolve_account(cli.user.as_deref())?;
    info!(command = cli.command.name(), email = %account.username, "Running command");

    if cli.command == Commands::Logout {
        auth::delete_password(&account.username)?;
        info!(email = %account.username, "Password removed");
        return Ok(());
    }

    if matches!(cli.command, Commands::Login { .. }) && cli.password.is_none() {
        return Err(AppError::other("Pass --password or set SIMPLENOTE_PASSWORD."));
    }

    let credentials = resolve_credentials(&account, cli.password.as_deref())?;
    let client = SimplenoteClient::from_settings(credentials, &config.api)?;

    match cli.command {
        Commands::Login { save } => {
            if client.get_token().await?.is_none() {
                return Err(AppError::other("Could not reach Simplenote to verify the login."));
            }
            if let Some(password) = cli.password.as_deref() {
                auth::store_password(&account.username, password)?;
            }
            if save {
                config.account = Some(account.clone());
                match &cli.config {
                    Some(path) => config.save_to(path)?,
                    None => config.save()?,
                }
            }
            info!(email = %account.username, "Logged in");
        }
        Commands::Logout => {}
        Commands::List { since, tags } => {
            let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
            let listing = client.get_note_list(since.as_deref(), &tags).await?;
            print_json(&listing.notes)?;
            if let Some(e) = listing.error {
                warn!("Listing incomplete: {}", e);
                return Err(e.into());
            }
        }
        Commands::Get { key, version } => print_json(&client.get_note(&key, version).await?)?,
        Commands::Add { content } => print_json(&client.add_note(content).await?)?,
        Commands::Trash { key } => print_json(&client.trash_note(&key).await?)?,
        Commands::Delete { key } => {
            client.delete_note(&key).await?;
            info!(key = %key, "Note deleted");
            print_json(&deleted_summary(&key))?;
        }
    }

    Ok(())
}

/// An explicit password wins; otherwise the keyring entry is used.
fn resolve_credentials(account: &Account, password: Option<&str>) -> Result<Credentials> {
    match password {
        Some(password) => Ok(Credentials::new(&account.username, password)),
        None => Ok(Credentials::from_keyring(&account.username)?),
    }
}

/// What `delete` prints once the note is gone.
fn deleted_summary(key: &str) -> serde_json::Value {
    serde_json::json!({ "key": key, "deleted": true })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::other(format!("Failed to encode output: {}", e)))?;
    writeln!(std::io::stdout().lock(), "{}", text)?;
    Ok(())
}
