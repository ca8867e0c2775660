//! OpenWatch operator CLI.
//!
//! Loads configuration, initialises logging, opens the configured backend
//! and runs one command against the record and audit services.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use openwatch_core::config::AppConfig;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let env = cli.environment();
    let config = match AppConfig::load(&env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::debug!(env = %env, backend = ?config.database.backend, "Configuration loaded");

    if let Err(e) = cli.execute(config).await {
        output::print_error(&e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so command output on stdout stays machine readable.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
