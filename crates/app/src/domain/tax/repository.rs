//! Tax Settings Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::tax::models::{CategoryTaxRule, CategoryTaxRuleUuid, TaxSettings};

const GET_TAX_SETTINGS_SQL: &str = include_str!("sql/get_tax_settings.sql");
const ENSURE_DEFAULT_SETTINGS_SQL: &str = include_str!("sql/ensure_default_settings.sql");
const LIST_CATEGORY_RULES_SQL: &str = include_str!("sql/list_category_rules.sql");
const UPSERT_CATEGORY_RULE_SQL: &str = include_str!("sql/upsert_category_rule.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgTaxRepository;

impl PgTaxRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_settings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<TaxSettings>, sqlx::Error> {
        query_as::<Postgres, TaxSettings>(GET_TAX_SETTINGS_SQL)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Seed the singleton settings row; a no-op when it already exists.
    pub(crate) async fn ensure_default_settings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        defaults: &TaxSettings,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(ENSURE_DEFAULT_SETTINGS_SQL)
            .bind(defaults.enabled)
            .bind(defaults.price_includes_tax)
            .bind(defaults.default_rate)
            .bind(&defaults.store_state)
            .bind(defaults.gstin.as_deref())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_category_rules(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<CategoryTaxRule>, sqlx::Error> {
        query_as::<Postgres, CategoryTaxRule>(LIST_CATEGORY_RULES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn upsert_category_rule(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        rule: &CategoryTaxRule,
    ) -> Result<CategoryTaxRule, sqlx::Error> {
        query_as::<Postgres, CategoryTaxRule>(UPSERT_CATEGORY_RULE_SQL)
            .bind(rule.uuid.into_uuid())
            .bind(rule.category_uuid)
            .bind(rule.rate)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for TaxSettings {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            enabled: row.try_get("enabled")?,
            price_includes_tax: row.try_get("price_includes_tax")?,
            default_rate: row.try_get::<Decimal, _>("default_rate")?,
            store_state: row.try_get("store_state")?,
            gstin: row.try_get("gstin")?,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CategoryTaxRule {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CategoryTaxRuleUuid::from_uuid(row.try_get("uuid")?),
            category_uuid: row.try_get("category_uuid")?,
            rate: row.try_get::<Decimal, _>("rate")?,
        })
    }
}
