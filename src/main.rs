//! simplenote - read and edit Simplenote notes from the terminal.

use std::process::ExitCode;

use clap::Parser;

use simplenote::cli::{self, Cli};
use simplenote::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.command.name(), cli.verbose) {
        eprintln!("warning: logging disabled: {}", e);
    }

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(critical = e.is_critical(), "Command failed: {}", e);
            eprintln!("error: {}", e.user_message());
            if let Some(action) = e.suggested_action() {
                eprintln!("hint: {}", action);
            }
            if e.is_critical() {
                if let Some(dir) = logging::log_directory() {
                    eprintln!("logs: {}", dir.display());
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}
