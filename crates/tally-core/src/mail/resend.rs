//! Hosted transactional-email provider backend
//!
//! HTTPS client for the Resend send-email API. Single attempt with the
//! client's default timeout.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::OutgoingEmail;

const DEFAULT_BASE_URL: &str = "https://api.resend.com";
const PROVIDER_SENDER: &str = "Tally <onboarding@resend.dev>";

/// Client for the hosted email provider
#[derive(Clone)]
pub struct ResendBackend {
    http_client: Client,
    base_url: String,
    api_key: String,
    sender: String,
}

impl ResendBackend {
    /// Create a provider client with the configured credential
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Create with an explicit host (used for testing against a stub)
    pub fn with_base_url(base_url: &str, api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            sender: PROVIDER_SENDER.to_string(),
        }
    }

    /// Submit one send request; returns the provider's message id
    pub(super) async fn send(&self, email: &OutgoingEmail) -> Result<String> {
        let request = SendEmailRequest {
            from: self.sender.clone(),
            to: vec![email.to.clone()],
            subject: email.subject.clone(),
            html: email.html.clone(),
        };

        let response = self
            .http_client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Mail(format!(
                "Email provider returned {}: {}",
                status, body
            )));
        }

        let reply: SendEmailResponse = response.json().await?;
        Ok(reply.id)
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    html: String,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}
