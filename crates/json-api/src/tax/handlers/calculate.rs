//! Calculate Tax Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use haberdash::tax::{TaxBreakdown, TaxLine};
use haberdash_app::domain::tax::models::{CalculateTax, TaxItemInput};

use crate::{extensions::*, state::State, tax::errors::into_status_error};

/// One cart line submitted for tax calculation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TaxItemRequest {
    /// Unit price in paise
    pub unit_price: u64,
    pub quantity: u32,
    /// Product category, when a category-specific rate may apply
    pub category_uuid: Option<Uuid>,
}

/// Calculate Tax Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CalculateTaxRequest {
    pub items: Vec<TaxItemRequest>,
    /// Shipping destination state, compared against the store state
    pub customer_state: String,
}

impl From<CalculateTaxRequest> for CalculateTax {
    fn from(request: CalculateTaxRequest) -> Self {
        CalculateTax {
            items: request
                .items
                .into_iter()
                .map(|item| TaxItemInput {
                    unit_price: item.unit_price,
                    quantity: item.quantity,
                    category_uuid: item.category_uuid,
                })
                .collect(),
            customer_state: request.customer_state,
        }
    }
}

/// Per-line tax amounts, in paise.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TaxLineResponse {
    pub taxable_amount: u64,
    /// Applied rate as a decimal percentage string, e.g. `"12"`
    pub rate: String,
    pub cgst: u64,
    pub sgst: u64,
    pub igst: u64,
    pub total_tax: u64,
}

impl From<TaxLine> for TaxLineResponse {
    fn from(line: TaxLine) -> Self {
        Self {
            taxable_amount: line.taxable_amount,
            rate: line.rate.to_string(),
            cgst: line.cgst,
            sgst: line.sgst,
            igst: line.igst,
            total_tax: line.total_tax,
        }
    }
}

/// Tax Breakdown Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TaxBreakdownResponse {
    pub lines: Vec<TaxLineResponse>,
    pub taxable_total: u64,
    pub cgst_total: u64,
    pub sgst_total: u64,
    pub igst_total: u64,
    pub tax_total: u64,
    /// Whether the supply was treated as intra-state (CGST + SGST)
    pub intra_state: bool,
}

impl From<TaxBreakdown> for TaxBreakdownResponse {
    fn from(breakdown: TaxBreakdown) -> Self {
        Self {
            lines: breakdown.lines.into_iter().map(Into::into).collect(),
            taxable_total: breakdown.taxable_total,
            cgst_total: breakdown.cgst_total,
            sgst_total: breakdown.sgst_total,
            igst_total: breakdown.igst_total,
            tax_total: breakdown.tax_total,
            intra_state: breakdown.intra_state,
        }
    }
}

/// Calculate Tax Handler
#[endpoint(
    tags("tax"),
    summary = "Calculate GST for a cart",
    responses(
        (status_code = StatusCode::OK, description = "Tax breakdown"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CalculateTaxRequest>,
    depot: &mut Depot,
) -> Result<Json<TaxBreakdownResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let breakdown = state
        .app
        .tax
        .calculate(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(breakdown.into()))
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use haberdash::{money::MoneyMathError, tax::TaxError};
    use haberdash_app::domain::tax::{MockTaxService, TaxServiceError};

    use crate::test_helpers::tax_service;

    use super::*;

    fn make_service(tax: MockTaxService) -> Service {
        tax_service(tax, Router::with_path("tax/calculate").post(handler))
    }

    fn intra_state_breakdown() -> TaxBreakdown {
        TaxBreakdown {
            lines: vec![TaxLine {
                taxable_amount: 89_286,
                rate: dec!(12),
                cgst: 5357,
                sgst: 5357,
                igst: 0,
                total_tax: 10_714,
            }],
            taxable_total: 89_286,
            cgst_total: 5357,
            sgst_total: 5357,
            igst_total: 0,
            tax_total: 10_714,
            intra_state: true,
        }
    }

    #[tokio::test]
    async fn test_calculate_returns_breakdown() -> TestResult {
        let mut tax = MockTaxService::new();

        tax.expect_calculate()
            .once()
            .withf(|request| {
                request.customer_state == "Maharashtra"
                    && request.items
                        == vec![TaxItemInput {
                            unit_price: 50_000,
                            quantity: 2,
                            category_uuid: None,
                        }]
            })
            .return_once(|_| Ok(intra_state_breakdown()));

        let mut res = TestClient::post("http://example.com/tax/calculate")
            .json(&json!({
                "items": [{ "unit_price": 50_000, "quantity": 2, "category_uuid": null }],
                "customer_state": "Maharashtra",
            }))
            .send(&make_service(tax))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: TaxBreakdownResponse = res.take_json().await?;

        assert_eq!(body.taxable_total, 89_286);
        assert_eq!(body.cgst_total, 5357);
        assert_eq!(body.sgst_total, 5357);
        assert_eq!(body.igst_total, 0);
        assert_eq!(body.tax_total, 10_714);
        assert!(body.intra_state);
        assert_eq!(body.lines.len(), 1);
        assert_eq!(body.lines[0].rate, "12");

        Ok(())
    }

    #[tokio::test]
    async fn test_calculate_empty_items_returns_400() -> TestResult {
        let mut tax = MockTaxService::new();

        tax.expect_calculate()
            .once()
            .return_once(|_| Err(TaxServiceError::Tax(TaxError::NoItems)));

        let res = TestClient::post("http://example.com/tax/calculate")
            .json(&json!({ "items": [], "customer_state": "Maharashtra" }))
            .send(&make_service(tax))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_calculate_blank_state_returns_400() -> TestResult {
        let mut tax = MockTaxService::new();

        tax.expect_calculate()
            .once()
            .return_once(|_| Err(TaxServiceError::Tax(TaxError::BlankCustomerState)));

        let res = TestClient::post("http://example.com/tax/calculate")
            .json(&json!({
                "items": [{ "unit_price": 50_000, "quantity": 1, "category_uuid": null }],
                "customer_state": "  ",
            }))
            .send(&make_service(tax))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_calculate_arithmetic_error_returns_500() -> TestResult {
        let mut tax = MockTaxService::new();

        tax.expect_calculate()
            .once()
            .return_once(|_| Err(TaxServiceError::Tax(TaxError::Money(MoneyMathError::Overflow))));

        let res = TestClient::post("http://example.com/tax/calculate")
            .json(&json!({
                "items": [{ "unit_price": 50_000, "quantity": 1, "category_uuid": null }],
                "customer_state": "Karnataka",
            }))
            .send(&make_service(tax))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
