//! Server configuration module

use clap::Parser;

use crate::config::{
    db::DatabaseConfig, gateway::GatewayConfig, logging::LoggingConfig, mail::MailConfig,
    server::ServerRuntimeConfig,
};

pub(crate) mod db;
pub(crate) mod gateway;
pub(crate) mod logging;
pub(crate) mod mail;
pub(crate) mod server;

/// Haberdash JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "haberdash-json", about = "Haberdash JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Payment gateway credentials.
    #[command(flatten)]
    pub gateway: GatewayConfig,

    /// Transactional mail settings.
    #[command(flatten)]
    pub mail: MailConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}
