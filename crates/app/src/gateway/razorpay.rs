//! Razorpay gateway client.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::{GatewayError, GatewayOrder, PaymentGateway};

type HmacSha256 = Hmac<Sha256>;

const DEFAULT_BASE_URL: &str = "https://api.razorpay.com";

/// Razorpay API credentials.
#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
}

/// Razorpay REST client. The key secret doubles as the HMAC key for
/// signature verification.
pub struct RazorpayClient {
    key_id: String,
    key_secret: Zeroizing<String>,
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    /// Paise.
    amount: u64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    id: String,
    amount: u64,
    currency: String,
}

impl RazorpayClient {
    #[must_use]
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            key_id: config.key_id,
            key_secret: Zeroizing::new(config.key_secret),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    #[cfg(test)]
    fn with_base_url(config: RazorpayConfig, base_url: &str) -> Self {
        let mut client = Self::new(config);
        client.base_url = base_url.to_string();

        client
    }
}

impl std::fmt::Debug for RazorpayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayClient")
            .field("key_id", &self.key_id)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(
        &self,
        amount: u64,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError> {
        let response = self
            .http
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(&self.key_id, Some(self.key_secret.as_str()))
            .json(&CreateOrderRequest {
                amount,
                currency: "INR",
                receipt,
            })
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            return Err(GatewayError::Rejected { status });
        }

        let body: CreateOrderResponse = response.json().await?;

        Ok(GatewayOrder {
            gateway_order_id: body.id,
            amount: body.amount,
            currency: body.currency,
        })
    }

    fn verify_signature(
        &self,
        gateway_order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool, GatewayError> {
        // Razorpay signs `order_id|payment_id` with the key secret and sends
        // the digest hex-encoded.
        let Ok(provided) = hex::decode(signature.trim()) else {
            return Ok(false);
        };

        let mut mac = HmacSha256::new_from_slice(self.key_secret.as_bytes())
            .map_err(|_invalid| GatewayError::InvalidKey)?;

        mac.update(gateway_order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());

        // verify_slice is constant-time; never compare digests as strings.
        Ok(mac.verify_slice(&provided).is_ok())
    }
}
