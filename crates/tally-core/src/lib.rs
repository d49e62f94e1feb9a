//! Tally Core Library
//!
//! Shared functionality for the Tally personal finance service:
//! - Database access and migrations
//! - Period statistics aggregation
//! - Pluggable insight backends (generative-AI API, mock)
//! - Mail dispatch (local development sink, hosted provider)
//! - Report orchestration

pub mod ai;
pub mod db;
pub mod error;
pub mod mail;
pub mod models;
pub mod report;
pub mod stats;

pub use ai::{GeminiBackend, InsightBackend, InsightClient, MockBackend, FALLBACK_INSIGHTS};
pub use db::Database;
pub use error::{Error, Result};
pub use mail::{DeliveryResult, Mailer, MockMailer, OutgoingEmail, ResendBackend, SmtpSink};
pub use report::{month_name, month_range, ReportService};
