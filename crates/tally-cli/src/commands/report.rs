//! Report generation command

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tally_core::{InsightClient, Mailer, ReportService};

use super::open_db;

pub async fn cmd_report(db_path: &Path, external_id: &str, email: bool) -> Result<()> {
    let db = open_db(db_path)?;

    let user = db
        .get_user_by_external_id(external_id)?
        .ok_or_else(|| anyhow!("No user '{}' - run 'tally seed' first", external_id))?;

    let insights = InsightClient::from_env();
    if insights.is_none() {
        println!("   💡 Tip: Set GEMINI_API_KEY for generated insights");
    }

    let service = ReportService::new(db, insights, Mailer::from_env());
    let payload = service
        .current_report(&user)
        .await
        .context("Failed to assemble report")?;

    println!();
    println!("📊 {} Report for {}", payload.month, payload.user_name);
    println!("   ─────────────────────────────");
    println!("   Income:   ${:.2}", payload.stats.total_income);
    println!("   Expenses: ${:.2}", payload.stats.total_expenses);
    println!("   Net:      ${:.2}", payload.stats.net_income());

    if !payload.stats.by_category.is_empty() {
        println!();
        println!("   By category:");
        for (category, amount) in &payload.stats.by_category {
            println!("     {:<16} ${:.2}", category, amount);
        }
    }

    println!();
    println!("   Insights:");
    for insight in &payload.insights {
        println!("     • {}", insight);
    }
    println!();

    if email {
        let to = user
            .email
            .as_deref()
            .ok_or_else(|| anyhow!("User '{}' has no email address on file", external_id))?;

        println!("📧 Sending report to {} ({})...", to, service.mailer().backend_name());

        let result = service.generate_and_send(&user).await?;
        if result.success {
            println!("✅ Report sent ({})", result.detail);
        } else {
            return Err(anyhow!("Email sending failed: {}", result.detail));
        }
    }

    Ok(())
}
