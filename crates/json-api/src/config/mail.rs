//! Mail Config

use clap::Args;
use haberdash_app::mail::ResendConfig;

/// Resend transactional mail settings.
#[derive(Debug, Args)]
pub struct MailConfig {
    /// Resend API key
    #[arg(long, env = "RESEND_API_KEY", hide_env_values = true)]
    pub resend_api_key: String,

    /// Sender address for order confirmations
    #[arg(long, env = "MAIL_FROM", default_value = "Haberdash <orders@haberdash.example>")]
    pub mail_from: String,
}

impl MailConfig {
    #[must_use]
    pub fn to_resend_config(&self) -> ResendConfig {
        ResendConfig {
            api_key: self.resend_api_key.clone(),
            from: self.mail_from.clone(),
        }
    }
}
