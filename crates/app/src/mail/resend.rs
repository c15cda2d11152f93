//! Resend mail client.

use async_trait::async_trait;
use serde::Serialize;
use zeroize::Zeroizing;

use crate::domain::orders::models::Order;

use super::{MailError, Mailer, templates};

const DEFAULT_BASE_URL: &str = "https://api.resend.com";

/// Resend API configuration.
#[derive(Debug, Clone)]
pub struct ResendConfig {
    pub api_key: String,
    /// Sender address, e.g. `Haberdash <orders@haberdash.example>`.
    pub from: String,
}

/// HTTP client for the Resend transactional mail API.
pub struct ResendMailer {
    api_key: Zeroizing<String>,
    from: String,
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: String,
    html: String,
}

impl ResendMailer {
    #[must_use]
    pub fn new(config: ResendConfig) -> Self {
        Self {
            api_key: Zeroizing::new(config.api_key),
            from: config.from,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }
}

impl std::fmt::Debug for ResendMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendMailer")
            .field("from", &self.from)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send_order_confirmation(&self, order: &Order) -> Result<(), MailError> {
        let html = templates::confirmation_html(order)?;

        let response = self
            .http
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(self.api_key.as_str())
            .json(&SendEmailRequest {
                from: &self.from,
                to: [order.email.as_str()],
                subject: format!("Order {} confirmed", order.order_number),
                html,
            })
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            return Err(MailError::Rejected { status });
        }

        Ok(())
    }
}
