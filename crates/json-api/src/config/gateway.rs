//! Payment Gateway Config

use clap::Args;
use haberdash_app::gateway::RazorpayConfig;

/// Razorpay credentials.
#[derive(Debug, Args)]
pub struct GatewayConfig {
    /// Razorpay key id
    #[arg(long, env = "RAZORPAY_KEY_ID")]
    pub razorpay_key_id: String,

    /// Razorpay key secret; also the HMAC key for signature verification
    #[arg(long, env = "RAZORPAY_KEY_SECRET", hide_env_values = true)]
    pub razorpay_key_secret: String,
}

impl GatewayConfig {
    #[must_use]
    pub fn to_razorpay_config(&self) -> RazorpayConfig {
        RazorpayConfig {
            key_id: self.razorpay_key_id.clone(),
            key_secret: self.razorpay_key_secret.clone(),
        }
    }
}
