//! Gemini backend implementation
//!
//! HTTP client for the hosted generative-language API. One request per report,
//! no retry, client default timeout only.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::PeriodStatistics;

use super::parsing::parse_insight_list;
use super::InsightBackend;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Gemini generative-language backend
#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    /// Create a new Gemini backend with the default host and model
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, DEFAULT_MODEL)
    }

    /// Create with an explicit host and model (used for testing against a stub)
    pub fn with_base_url(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Create from environment variables (`GEMINI_API_KEY`, `GEMINI_MODEL`)
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Some(Self::with_base_url(DEFAULT_BASE_URL, &api_key, &model))
    }

    /// Build the fixed insight prompt for one month's statistics
    fn build_prompt(stats: &PeriodStatistics, month: &str) -> String {
        let categories = stats
            .by_category
            .iter()
            .map(|(category, amount)| format!("{}: ${}", category, amount))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Analyze this financial data and provide 3 concise, actionable insights.\n\
             Focus on spending patterns and practical advice.\n\
             Keep it friendly and conversational.\n\
             \n\
             Financial Data for {month}:\n\
             - Total Income: ${income}\n\
             - Total Expenses: ${expenses}\n\
             - Net Income: ${net}\n\
             - Expense Categories: {categories}\n\
             \n\
             Format the response as a JSON array of strings, like this:\n\
             [\"insight 1\", \"insight 2\", \"insight 3\"]",
            month = month,
            income = stats.total_income,
            expenses = stats.total_expenses,
            net = stats.net_income(),
            categories = categories,
        )
    }

    /// Send one generateContent request and return the raw reply text
    async fn generate_content(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self.http_client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Insight(format!(
                "Generative API returned {}: {}",
                status, body
            )));
        }

        let reply: GenerateContentResponse = response.json().await?;
        let text = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| Error::Insight("Generative API reply had no candidates".into()))?;

        debug!("Generative API reply: {}", text);
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[async_trait]
impl InsightBackend for GeminiBackend {
    async fn generate_insights(
        &self,
        stats: &PeriodStatistics,
        month: &str,
    ) -> Result<Vec<String>> {
        let prompt = Self::build_prompt(stats, month);
        let text = self.generate_content(&prompt).await?;
        parse_insight_list(&text)
    }

    async fn health_check(&self) -> bool {
        // A models listing is the cheapest authenticated round trip
        let url = format!("{}/v1beta/models?key={}", self.base_url, self.api_key);
        match self.http_client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::sample_statistics;

    #[test]
    fn test_prompt_embeds_totals_and_categories() {
        let prompt = GeminiBackend::build_prompt(&sample_statistics(), "August");

        assert!(prompt.contains("Financial Data for August"));
        assert!(prompt.contains("Total Income: $5800"));
        assert!(prompt.contains("Total Expenses: $3700"));
        assert!(prompt.contains("Net Income: $2100"));
        assert!(prompt.contains("Housing: $1400"));
        assert!(prompt.contains("JSON array of strings"));
    }

    #[test]
    fn test_from_env_requires_credential() {
        // Only assert the constructor shape; env vars are not touched here
        let backend = GeminiBackend::new("some-key");
        assert_eq!(backend.model(), DEFAULT_MODEL);
        assert_eq!(backend.host(), DEFAULT_BASE_URL);
    }
}
