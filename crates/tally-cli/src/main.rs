//! Tally CLI - Personal finance reports, on demand
//!
//! Usage:
//!   tally init                Initialize database
//!   tally seed                Insert demo data
//!   tally report --email      Generate and send the current report
//!   tally serve --port 3000   Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Seed => commands::cmd_seed(&cli.db),
        Commands::Report { user, email } => commands::cmd_report(&cli.db, &user, email).await,
        Commands::Serve {
            port,
            host,
            no_auth,
        } => commands::cmd_serve(&cli.db, &host, port, no_auth).await,
        Commands::Status => commands::cmd_status(&cli.db),
    }
}
