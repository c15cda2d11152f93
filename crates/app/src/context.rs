//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        checkout::{CheckoutService, GatewayCheckoutService},
        coupons::{CouponsService, PgCouponsService},
        orders::PgOrdersService,
        tax::{PgTaxService, TaxService},
    },
    gateway::{RazorpayClient, RazorpayConfig},
    mail::{ResendConfig, ResendMailer},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub coupons: Arc<dyn CouponsService>,
    pub tax: Arc<dyn TaxService>,
    pub checkout: Arc<dyn CheckoutService>,
}

impl AppContext {
    /// Build application context from a database URL and provider credentials.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        gateway: RazorpayConfig,
        mail: ResendConfig,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        let orders = Arc::new(PgOrdersService::new(db.clone()));
        let gateway = Arc::new(RazorpayClient::new(gateway));
        let mailer = Arc::new(ResendMailer::new(mail));

        Ok(Self {
            coupons: Arc::new(PgCouponsService::new(db.clone())),
            tax: Arc::new(PgTaxService::new(db)),
            checkout: Arc::new(GatewayCheckoutService::new(orders, gateway, mailer)),
        })
    }
}
