//! Mock insight backend for testing
//!
//! Returns deterministic insights derived from the statistics, or a
//! configurable failure for exercising the fallback policy.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::PeriodStatistics;

use super::InsightBackend;

/// Mock insight backend
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Whether generate_insights should return an error
    pub failing: bool,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a healthy mock backend
    pub fn new() -> Self {
        Self {
            healthy: true,
            failing: false,
        }
    }

    /// Create a mock backend whose insight calls fail
    pub fn failing() -> Self {
        Self {
            healthy: false,
            failing: true,
        }
    }
}

#[async_trait]
impl InsightBackend for MockBackend {
    async fn generate_insights(
        &self,
        stats: &PeriodStatistics,
        month: &str,
    ) -> Result<Vec<String>> {
        if self.failing {
            return Err(Error::Insight("mock backend configured to fail".into()));
        }

        let top_category = stats
            .by_category
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(category, _)| category.as_str())
            .unwrap_or("spending");

        Ok(vec![
            format!("In {}, {} was your largest expense category.", month, top_category),
            format!(
                "You spent ${:.2} against ${:.2} of income.",
                stats.total_expenses, stats.total_income
            ),
            format!("Net income for the month: ${:.2}.", stats.net_income()),
        ])
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
