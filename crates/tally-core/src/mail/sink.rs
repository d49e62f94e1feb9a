//! Local development mail sink backend
//!
//! Plaintext SMTP to a MailHog-style sink on a fixed local port. No
//! authentication, no TLS.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::Result;

use super::OutgoingEmail;

const SINK_HOST: &str = "127.0.0.1";
const SINK_PORT: u16 = 1025;
const SINK_SENDER: &str = "Tally <test@example.com>";

/// SMTP client for the local development sink
#[derive(Clone)]
pub struct SmtpSink {
    host: String,
    port: u16,
    sender: String,
}

impl Default for SmtpSink {
    fn default() -> Self {
        Self::new()
    }
}

impl SmtpSink {
    /// Sink at the fixed development address
    pub fn new() -> Self {
        Self::with_address(SINK_HOST, SINK_PORT)
    }

    /// Sink at an explicit address (used for testing)
    pub fn with_address(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            sender: SINK_SENDER.to_string(),
        }
    }

    /// Submit one message; returns the sink's queue response
    pub(super) async fn send(&self, email: &OutgoingEmail) -> Result<String> {
        let message = Message::builder()
            .from(self.sender.parse::<Mailbox>()?)
            .to(email.to.parse::<Mailbox>()?)
            .subject(&email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())?;

        // builder_dangerous: the sink speaks plaintext SMTP
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host)
            .port(self.port)
            .build();

        let response = transport.send(message).await?;
        Ok(response.message().collect::<Vec<_>>().join(" "))
    }
}
