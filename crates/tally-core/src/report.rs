//! Report orchestration
//!
//! One request/response flow: load the calendar month's transactions,
//! aggregate them (or substitute the demo sample when the month is empty),
//! generate insights, and either return the payload or render and dispatch
//! the report email.
//!
//! Failure tiers:
//! - missing data and insight failures are swallowed and substituted
//! - delivery failures come back as a structured [`DeliveryResult`]
//! - a user without an email on file fails fast before any work

use chrono::{Datelike, NaiveDate, Utc};
use tracing::{debug, info};

use crate::ai::{self, InsightClient};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::mail::{template, DeliveryResult, Mailer, OutgoingEmail};
use crate::models::{ReportPayload, User};
use crate::stats;

/// First and last day of the calendar month containing `today`
pub fn month_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = today.with_day(1).unwrap_or(today);
    let next_month = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    };
    let last = next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(today);
    (first, last)
}

/// Month label for `today`, e.g. "August"
pub fn month_name(today: NaiveDate) -> String {
    today.format("%B").to_string()
}

/// Report orchestrator with explicitly injected collaborators
///
/// The database handle, insight client, and mailer are passed in at
/// construction and owned by the hosting process; nothing is looked up from
/// ambient global state.
#[derive(Clone)]
pub struct ReportService {
    db: Database,
    insights: Option<InsightClient>,
    mailer: Mailer,
}

impl ReportService {
    pub fn new(db: Database, insights: Option<InsightClient>, mailer: Mailer) -> Self {
        Self {
            db,
            insights,
            mailer,
        }
    }

    pub fn mailer(&self) -> &Mailer {
        &self.mailer
    }

    pub fn insight_client(&self) -> Option<&InsightClient> {
        self.insights.as_ref()
    }

    /// Assemble the current calendar month's report for a user
    ///
    /// An empty month substitutes the fixed sample statistics rather than
    /// zeros; insight failures degrade to the fallback list. Neither
    /// condition fails the report.
    pub async fn current_report(&self, user: &User) -> Result<ReportPayload> {
        let today = Utc::now().date_naive();
        let (from, to) = month_range(today);
        let month = month_name(today);

        let transactions = self.db.transactions_in_range(user.id, from, to)?;
        let stats = if transactions.is_empty() {
            debug!(user = user.id, "No transactions this month, using sample statistics");
            stats::sample_statistics()
        } else {
            stats::aggregate(&transactions)
        };

        let insights = ai::generate_insights(self.insights.as_ref(), &stats, &month).await;

        Ok(ReportPayload {
            user_name: user.name.clone(),
            month,
            stats,
            insights,
        })
    }

    /// Generate the report and dispatch it to the user's email address
    ///
    /// Fails fast when no email is on file. The delivery attempt itself is
    /// made once and its outcome returned; the caller decides whether a
    /// failed delivery is terminal.
    pub async fn generate_and_send(&self, user: &User) -> Result<DeliveryResult> {
        let email = user
            .email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| Error::NotFound("No email address found for your account".into()))?;

        let payload = self.current_report(user).await?;
        let subject = format!("Your On-Demand Financial Report - {}", payload.month);

        info!(user = user.id, to = %email, "Dispatching report email");

        let result = self
            .mailer
            .send(&OutgoingEmail {
                to: email.to_string(),
                subject,
                html: template::render_report_email(&payload),
            })
            .await;

        Ok(result)
    }

    /// Dispatch a demonstration report built from the fixed sample statistics
    ///
    /// One parameterized harness replaces ad-hoc demo sends: the caller
    /// chooses the recipient and whether to use the live insight backend or
    /// the fallback list.
    pub async fn send_sample_report(
        &self,
        to: &str,
        user_name: &str,
        live_insights: bool,
    ) -> Result<DeliveryResult> {
        let today = Utc::now().date_naive();
        let month = month_name(today);
        let stats = stats::sample_statistics();

        let insights = if live_insights {
            ai::generate_insights(self.insights.as_ref(), &stats, &month).await
        } else {
            ai::fallback_insights()
        };

        let payload = ReportPayload {
            user_name: user_name.to_string(),
            month: month.clone(),
            stats,
            insights,
        };

        let subject = format!("Your On-Demand Financial Report - {}", month);
        let result = self
            .mailer
            .send(&OutgoingEmail {
                to: to.to_string(),
                subject,
                html: template::render_report_email(&payload),
            })
            .await;

        Ok(result)
    }
}
