//! Notification dispatch
//!
//! Delivers a rendered report to exactly one of two backends: a local
//! development mail sink (unauthenticated SMTP on a fixed port) or a hosted
//! transactional-email provider (credential-keyed HTTPS API).
//!
//! Backend selection happens once, at construction, from the provider
//! credential: absent or the recognized placeholder selects the sink,
//! anything else selects the hosted provider. A delivery attempt is made
//! exactly once; failures are captured into the returned [`DeliveryResult`],
//! never retried, and never fall back to the other backend.

mod mock;
mod resend;
mod sink;
pub mod template;

pub use mock::MockMailer;
pub use resend::ResendBackend;
pub use sink::SmtpSink;

use serde::Serialize;
use tracing::{info, warn};

/// Credential value that means "not a real credential, use the local sink"
pub const PLACEHOLDER_CREDENTIAL: &str = "test_key";

/// Environment variable carrying the hosted provider credential
pub const PROVIDER_KEY_ENV: &str = "RESEND_API_KEY";

/// A message ready for delivery
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Outcome of one delivery attempt
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryResult {
    pub success: bool,
    /// Backend receipt (message id / queue response) on success, error detail
    /// on failure
    pub detail: String,
}

impl DeliveryResult {
    fn ok(detail: String) -> Self {
        Self {
            success: true,
            detail,
        }
    }

    fn failed(detail: String) -> Self {
        Self {
            success: false,
            detail,
        }
    }
}

/// Mail dispatcher with a fixed backend chosen at construction
#[derive(Clone)]
pub enum Mailer {
    /// Local development mail sink (MailHog-style SMTP)
    Sink(SmtpSink),
    /// Hosted transactional-email provider
    Resend(ResendBackend),
    /// In-memory recorder for tests
    Mock(MockMailer),
}

impl Mailer {
    /// Choose a backend from the provider credential
    ///
    /// No credential, a blank credential, or the placeholder value all select
    /// the local sink; any other value selects the hosted provider.
    pub fn from_credential(credential: Option<&str>) -> Self {
        match credential.map(str::trim) {
            None | Some("") | Some(PLACEHOLDER_CREDENTIAL) => Self::Sink(SmtpSink::new()),
            Some(key) => Self::Resend(ResendBackend::new(key)),
        }
    }

    /// Choose a backend from the `RESEND_API_KEY` environment variable
    pub fn from_env() -> Self {
        let credential = std::env::var(PROVIDER_KEY_ENV).ok();
        Self::from_credential(credential.as_deref())
    }

    /// Backend name for logging and `tally status`
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Sink(_) => "local-sink",
            Self::Resend(_) => "resend",
            Self::Mock(_) => "mock",
        }
    }

    /// Attempt delivery once
    ///
    /// Errors are captured into the result rather than propagated; the caller
    /// decides whether a failed delivery is terminal.
    pub async fn send(&self, email: &OutgoingEmail) -> DeliveryResult {
        let attempt = match self {
            Self::Sink(backend) => backend.send(email).await,
            Self::Resend(backend) => backend.send(email).await,
            Self::Mock(backend) => backend.send(email).await,
        };

        match attempt {
            Ok(receipt) => {
                info!(
                    backend = self.backend_name(),
                    to = %email.to,
                    "Email delivered: {}",
                    receipt
                );
                DeliveryResult::ok(receipt)
            }
            Err(e) => {
                warn!(
                    backend = self.backend_name(),
                    to = %email.to,
                    "Email delivery failed: {}",
                    e
                );
                DeliveryResult::failed(e.to_string())
            }
        }
    }
}
