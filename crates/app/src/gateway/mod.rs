//! Payment gateway adapter.

pub mod razorpay;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

pub use razorpay::{RazorpayClient, RazorpayConfig};

/// A gateway-side order, created before the customer pays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOrder {
    /// The gateway's identifier, referenced by the internal order.
    pub gateway_order_id: String,

    /// Amount in paise.
    pub amount: u64,

    /// ISO currency code; always `INR` for this store.
    pub currency: String,
}

/// Errors raised by the gateway adapter.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed")]
    Http(#[from] reqwest::Error),

    #[error("gateway rejected the request with status {status}")]
    Rejected { status: reqwest::StatusCode },

    #[error("gateway key material was rejected")]
    InvalidKey,
}

/// Remote payment gateway contract.
#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a gateway-side order for `amount` paise.
    async fn create_order(&self, amount: u64, receipt: &str)
    -> Result<GatewayOrder, GatewayError>;

    /// Check an inbound payment signature.
    ///
    /// Returns `Ok(false)` for a well-formed but wrong signature; errors are
    /// reserved for key-material problems.
    fn verify_signature(
        &self,
        gateway_order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool, GatewayError>;
}
