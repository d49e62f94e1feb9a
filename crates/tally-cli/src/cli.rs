//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Personal finance reports, on demand
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Self-hosted personal finance report service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Insert a demo user with an account, transactions, and a budget
    Seed,

    /// Print the current month's report, optionally emailing it
    Report {
        /// External id of the user to report on
        #[arg(long, default_value = "demo-user")]
        user: String,

        /// Also dispatch the report to the user's email address
        #[arg(long)]
        email: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, the server requires an identity header forwarded by the
        /// authenticating gateway in front of it.
        #[arg(long)]
        no_auth: bool,
    },

    /// Show database and backend configuration status
    Status,
}
