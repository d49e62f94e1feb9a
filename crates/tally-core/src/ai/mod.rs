//! Pluggable insight backend abstraction
//!
//! Generates short natural-language insights from period statistics by
//! calling a generative-language-model API.
//!
//! # Architecture
//!
//! - `InsightBackend` trait: the interface all backends implement
//! - `InsightClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables (used by `InsightClient::from_env`):
//! - `GEMINI_API_KEY`: credential for the hosted generative-language API
//! - `GEMINI_MODEL`: model name (default: gemini-1.5-flash)
//!
//! # Failure policy
//!
//! A report must never fail because insight generation failed. Use
//! [`generate_insights`] at call sites: any backend error is logged and
//! replaced with the fixed fallback list.

mod gemini;
mod mock;
pub mod parsing;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;

use async_trait::async_trait;
use tracing::warn;

use crate::error::Result;
use crate::models::PeriodStatistics;

/// Fallback insights used whenever the model call fails
pub const FALLBACK_INSIGHTS: [&str; 3] = [
    "Your highest expense category this month might need attention.",
    "Consider setting up a budget for better financial management.",
    "Track your recurring expenses to identify potential savings.",
];

/// Trait defining the interface for insight backends
#[async_trait]
pub trait InsightBackend: Send + Sync {
    /// Generate a short list of natural-language insights for one month
    async fn generate_insights(
        &self,
        stats: &PeriodStatistics,
        month: &str,
    ) -> Result<Vec<String>>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete insight client with compile-time dispatch
#[derive(Clone)]
pub enum InsightClient {
    Gemini(GeminiBackend),
    Mock(MockBackend),
}

impl InsightClient {
    /// Create a client from environment variables
    ///
    /// Returns None when no credential is configured; callers then serve the
    /// fallback insights.
    pub fn from_env() -> Option<Self> {
        GeminiBackend::from_env().map(Self::Gemini)
    }

    pub async fn generate_insights(
        &self,
        stats: &PeriodStatistics,
        month: &str,
    ) -> Result<Vec<String>> {
        match self {
            Self::Gemini(b) => b.generate_insights(stats, month).await,
            Self::Mock(b) => b.generate_insights(stats, month).await,
        }
    }

    pub async fn health_check(&self) -> bool {
        match self {
            Self::Gemini(b) => b.health_check().await,
            Self::Mock(b) => b.health_check().await,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Self::Gemini(b) => b.model(),
            Self::Mock(b) => b.model(),
        }
    }

    pub fn host(&self) -> &str {
        match self {
            Self::Gemini(b) => b.host(),
            Self::Mock(b) => b.host(),
        }
    }
}

/// The fixed fallback insight list
pub fn fallback_insights() -> Vec<String> {
    FALLBACK_INSIGHTS.iter().map(|s| s.to_string()).collect()
}

/// Generate insights with the never-fail policy applied
///
/// A missing client, transport error, or malformed model reply all degrade to
/// the fallback list; the failure is only logged.
pub async fn generate_insights(
    client: Option<&InsightClient>,
    stats: &PeriodStatistics,
    month: &str,
) -> Vec<String> {
    let Some(client) = client else {
        return fallback_insights();
    };

    match client.generate_insights(stats, month).await {
        Ok(insights) => insights,
        Err(e) => {
            warn!("Insight generation failed, using fallback: {}", e);
            fallback_insights()
        }
    }
}
