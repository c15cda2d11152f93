//! Tax Models

use jiff::Timestamp;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::uuids::TypedUuid;

/// Category Tax Rule UUID
pub type CategoryTaxRuleUuid = TypedUuid<CategoryTaxRule>;

/// Store-wide tax configuration; a singleton row.
#[derive(Debug, Clone)]
pub struct TaxSettings {
    pub enabled: bool,
    pub price_includes_tax: bool,
    /// Default GST rate as a percentage.
    pub default_rate: Decimal,
    /// The store's home state, used for the intra/inter-state split.
    pub store_state: String,
    /// GST registration number shown on invoices.
    pub gstin: Option<String>,
    pub updated_at: Timestamp,
}

/// Per-category GST rate override.
#[derive(Debug, Clone)]
pub struct CategoryTaxRule {
    pub uuid: CategoryTaxRuleUuid,
    pub category_uuid: Uuid,
    /// Override rate as a percentage.
    pub rate: Decimal,
}

/// One cart line submitted for tax calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxItemInput {
    /// Unit price in paise.
    pub unit_price: u64,
    pub quantity: u32,
    pub category_uuid: Option<Uuid>,
}

/// Tax calculation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculateTax {
    pub items: Vec<TaxItemInput>,
    pub customer_state: String,
}
