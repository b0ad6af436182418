//! Notedigest CLI
//!
//! Search and summarize your note store from the command line.

use clap::Parser;
use notedigest_core::{error::exit_codes, Config, DigestError};
use std::path::PathBuf;

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    // Resolve config (use NOTEDIGEST_CONFIG env var if set, otherwise default)
    let config_path = std::env::var("NOTEDIGEST_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Config::default_path());

    let result = match cli.command {
        Commands::Search(args) => commands::search::run(args, &config_path, cli.format).await,
        Commands::Recent(args) => commands::recent::run(args, &config_path, cli.format).await,
        Commands::Config(args) => commands::config::run(args, &config_path),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        std::process::exit(exit_code(&err));
    }
}

/// Map an error to its process exit code
fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<DigestError>()
        .map(DigestError::exit_code)
        .unwrap_or(exit_codes::GENERAL_ERROR)
}
