//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `cmd_seed` - Insert demo data

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tally_core::db::Database;

/// Open the database, running migrations on first use
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow!("Database path must be valid UTF-8"))?;
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Seed demo data: tally seed");
    println!("  2. Start the API: tally serve");

    Ok(())
}

pub fn cmd_seed(db_path: &Path) -> Result<()> {
    println!("🌱 Seeding demo data...");

    let db = open_db(db_path)?;
    let user_id = db.seed_demo_data().context("Failed to seed demo data")?;

    let count = db.count_transactions()?;
    println!("   Demo user id: {}", user_id);
    println!("   Transactions on file: {}", count);
    println!();
    println!("✅ Done. Try: tally report");

    Ok(())
}
