// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Kansel - cancellation-email triage service.
//!
//! Binary entry point: loads and validates configuration, initializes
//! tracing, and dispatches to one of the subcommands.

mod process;
mod status;
mod worker;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Kansel - cancellation-email triage service.
#[derive(Parser, Debug)]
#[command(name = "kansel", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the Slack retry-queue worker loop.
    Worker,
    /// Show retry-queue counts by status.
    Status {
        /// Output structured JSON for scripting.
        #[arg(long)]
        json: bool,
    },
    /// Run the triage pipeline once on a local email file.
    Process {
        /// Path to a JSON webhook payload or a plain-text email body.
        file: std::path::PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match kansel_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            kansel_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.agent.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Some(Commands::Worker) => worker::run_worker(&config).await,
        Some(Commands::Status { json }) => status::run_status(&config, json).await,
        Some(Commands::Process { file }) => process::run_process(&config, &file).await,
        None => {
            println!("kansel: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("kansel: {e}");
        std::process::exit(1);
    }
}
