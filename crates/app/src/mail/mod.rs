//! Transactional mail.

pub mod resend;
mod templates;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::domain::orders::models::Order;

pub use resend::{ResendConfig, ResendMailer};
pub use templates::confirmation_html;

/// Errors raised while sending mail.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail request failed")]
    Http(#[from] reqwest::Error),

    #[error("mail provider rejected the request with status {status}")]
    Rejected { status: reqwest::StatusCode },

    #[error("mail body could not be rendered")]
    Render,
}

/// Outbound mail contract.
#[automock]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the order confirmation for a settled order.
    async fn send_order_confirmation(&self, order: &Order) -> Result<(), MailError>;
}
