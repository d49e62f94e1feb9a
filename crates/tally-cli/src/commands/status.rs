//! Status command implementation

use std::path::Path;

use anyhow::Result;
use tally_core::{ai::InsightClient, mail::Mailer};

use super::open_db;

pub fn cmd_status(db_path: &Path) -> Result<()> {
    use std::fs;

    println!();
    println!("📊 Tally Status");
    println!("   ─────────────────────────────────────────────");

    // Database path and size
    println!("   Database: {}", db_path.display());
    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
    }

    // Row counts
    if db_path.exists() {
        match open_db(db_path) {
            Ok(db) => {
                println!();
                println!("   Users: {}", db.count_users()?);
                println!("   Accounts: {}", db.count_accounts()?);
                println!("   Transactions: {}", db.count_transactions()?);
            }
            Err(e) => {
                println!();
                println!("   ❌ Error opening database: {}", e);
            }
        }
    }

    // Backend configuration
    println!();
    match InsightClient::from_env() {
        Some(client) => println!(
            "   🤖 Insights: {} (model: {})",
            client.host(),
            client.model()
        ),
        None => println!("   🤖 Insights: fallback only (set GEMINI_API_KEY)"),
    }
    println!("   📧 Mail: {}", Mailer::from_env().backend_name());

    println!();
    Ok(())
}
