//! CLI frontend for Terminal Mystery.

mod commands;
mod logging;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "terminal-mystery",
    about = "Terminal Mystery: explore a mysterious remote system, one command at a time",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to config.toml (default: ./config.toml, then the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the main menu and play (the default)
    Play,

    /// List saved sessions, most recently played first
    List,

    /// Delete a saved session
    Delete {
        /// Session id (see `list`)
        id: String,
    },

    /// Show a saved session's summary and transcript
    Show {
        /// Session id (see `list`)
        id: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_guard = logging::init();

    let config = cli.config.as_deref();
    let result = match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => commands::play::run(config),
        Commands::List => commands::list::run(config),
        Commands::Delete { id } => commands::delete::run(config, &id),
        Commands::Show { id } => commands::show::run(config, &id),
    };

    // returning (not exiting) lets the log guard flush
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "exiting with error");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
