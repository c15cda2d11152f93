//! Tax service.
//!
//! Settings reads are pure queries; the request path never writes defaults.
//! Seeding the singleton row is a separate idempotent operation driven by
//! the CLI.

use async_trait::async_trait;
use haberdash::tax::{self, StoreTaxProfile, TaxBreakdown, TaxableItem};
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::{Decimal, dec};
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::tax::{
        errors::TaxServiceError,
        models::{CalculateTax, CategoryTaxRule, TaxSettings},
        repository::PgTaxRepository,
    },
};

/// Default GST rate for apparel above the ₹1000 threshold.
pub const DEFAULT_GST_RATE: Decimal = dec!(12);

/// Store home state used until settings are configured.
pub const DEFAULT_STORE_STATE: &str = "Maharashtra";

#[derive(Debug, Clone)]
pub struct PgTaxService {
    db: Db,
    repository: PgTaxRepository,
}

impl PgTaxService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgTaxRepository::new(),
        }
    }
}

#[async_trait]
impl TaxService for PgTaxService {
    async fn calculate(&self, request: CalculateTax) -> Result<TaxBreakdown, TaxServiceError> {
        let mut tx = self.db.begin().await?;

        let settings = self.repository.get_settings(&mut tx).await?;
        let rules = self.repository.list_category_rules(&mut tx).await?;

        tx.commit().await?;

        let profile = settings.map_or_else(default_profile, profile_from_settings);

        let overrides: FxHashMap<Uuid, Decimal> = rules
            .into_iter()
            .map(|rule| (rule.category_uuid, rule.rate))
            .collect();

        let items: Vec<TaxableItem> = request
            .items
            .iter()
            .map(|item| TaxableItem {
                unit_price: item.unit_price,
                quantity: item.quantity,
                rate_override: item
                    .category_uuid
                    .and_then(|category| overrides.get(&category).copied()),
            })
            .collect();

        let breakdown = tax::calculate(&profile, &items, &request.customer_state)?;

        Ok(breakdown)
    }

    async fn get_settings(&self) -> Result<Option<TaxSettings>, TaxServiceError> {
        let mut tx = self.db.begin().await?;

        let settings = self.repository.get_settings(&mut tx).await?;

        tx.commit().await?;

        Ok(settings)
    }

    async fn ensure_default_settings(&self) -> Result<bool, TaxServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .ensure_default_settings(&mut tx, &default_settings())
            .await?;

        tx.commit().await?;

        Ok(rows_affected > 0)
    }

    async fn set_category_rule(
        &self,
        rule: CategoryTaxRule,
    ) -> Result<CategoryTaxRule, TaxServiceError> {
        let mut tx = self.db.begin().await?;

        let rule = self.repository.upsert_category_rule(&mut tx, &rule).await?;

        tx.commit().await?;

        Ok(rule)
    }
}

#[automock]
#[async_trait]
pub trait TaxService: Send + Sync {
    /// Compute the GST breakdown for a cart against stored settings and
    /// category overrides.
    async fn calculate(&self, request: CalculateTax) -> Result<TaxBreakdown, TaxServiceError>;

    /// Read the configured settings, if any.
    async fn get_settings(&self) -> Result<Option<TaxSettings>, TaxServiceError>;

    /// Idempotently seed the default settings row. Returns whether a row was
    /// written.
    async fn ensure_default_settings(&self) -> Result<bool, TaxServiceError>;

    /// Create or replace a category rate override.
    async fn set_category_rule(
        &self,
        rule: CategoryTaxRule,
    ) -> Result<CategoryTaxRule, TaxServiceError>;
}

fn profile_from_settings(settings: TaxSettings) -> StoreTaxProfile {
    StoreTaxProfile {
        enabled: settings.enabled,
        price_includes_tax: settings.price_includes_tax,
        default_rate: settings.default_rate,
        store_state: settings.store_state,
    }
}

fn default_profile() -> StoreTaxProfile {
    StoreTaxProfile {
        enabled: true,
        price_includes_tax: false,
        default_rate: DEFAULT_GST_RATE,
        store_state: DEFAULT_STORE_STATE.to_string(),
    }
}

fn default_settings() -> TaxSettings {
    TaxSettings {
        enabled: true,
        price_includes_tax: false,
        default_rate: DEFAULT_GST_RATE,
        store_state: DEFAULT_STORE_STATE.to_string(),
        gstin: None,
        updated_at: Timestamp::now(),
    }
}
