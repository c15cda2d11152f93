//! GST breakdown calculation.
//!
//! Indian GST splits into CGST + SGST when the customer and store are in the
//! same state, or applies in full as IGST across state lines. The calculator
//! here is pure: the caller resolves category rate overrides and store
//! configuration before handing them in.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::money::{MoneyMathError, inclusive_base, percent_of_minor};

/// Store-level tax configuration, as resolved by the caller.
#[derive(Debug, Clone)]
pub struct StoreTaxProfile {
    /// Whether GST is collected at all. When false, breakdowns are zeroed.
    pub enabled: bool,

    /// Whether listed prices already include GST.
    pub price_includes_tax: bool,

    /// Default GST rate as a percentage, e.g. `18` for 18%.
    pub default_rate: Decimal,

    /// The store's home state, e.g. `"Maharashtra"`.
    pub store_state: String,
}

/// One cart line as seen by the calculator.
#[derive(Debug, Clone, Copy)]
pub struct TaxableItem {
    /// Unit price in paise.
    pub unit_price: u64,

    /// Units of this line.
    pub quantity: u32,

    /// Category GST rate override, if the item's category has one.
    pub rate_override: Option<Decimal>,
}

/// Per-line tax amounts, all in paise.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TaxLine {
    /// Amount GST is levied on, after any price-inclusive adjustment.
    pub taxable_amount: u64,

    /// Applicable GST rate for this line.
    pub rate: Decimal,

    /// Central GST portion (intra-state only).
    pub cgst: u64,

    /// State GST portion (intra-state only).
    pub sgst: u64,

    /// Integrated GST portion (inter-state only).
    pub igst: u64,

    /// Total GST for the line; always `cgst + sgst + igst`.
    pub total_tax: u64,
}

/// Aggregate breakdown over all lines.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TaxBreakdown {
    /// Per-line amounts in input order.
    pub lines: Vec<TaxLine>,

    /// Sum of all taxable amounts.
    pub taxable_total: u64,

    /// Sum of all CGST amounts.
    pub cgst_total: u64,

    /// Sum of all SGST amounts.
    pub sgst_total: u64,

    /// Sum of all IGST amounts.
    pub igst_total: u64,

    /// Total GST across the cart.
    pub tax_total: u64,

    /// Whether the supply was intra-state (CGST/SGST) or not (IGST).
    pub intra_state: bool,
}

/// Errors raised by [`calculate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxError {
    /// No items were provided.
    #[error("no items provided; nothing to calculate tax on")]
    NoItems,

    /// The customer state was missing or blank.
    #[error("customer state is required")]
    BlankCustomerState,

    /// Wrapped minor-unit arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyMathError),
}

/// Calculate the GST breakdown for a cart.
///
/// The applicable rate per line is the category override when present, else
/// the store default. Intra-state supplies split the rate evenly into
/// CGST + SGST; inter-state supplies carry the full rate as IGST.
///
/// # Errors
///
/// - [`TaxError::NoItems`] when `items` is empty.
/// - [`TaxError::BlankCustomerState`] when `customer_state` is blank.
/// - [`TaxError::Money`] when rate arithmetic overflows.
pub fn calculate(
    profile: &StoreTaxProfile,
    items: &[TaxableItem],
    customer_state: &str,
) -> Result<TaxBreakdown, TaxError> {
    if items.is_empty() {
        return Err(TaxError::NoItems);
    }

    let customer_state = customer_state.trim();

    if customer_state.is_empty() {
        return Err(TaxError::BlankCustomerState);
    }

    let intra_state = customer_state.eq_ignore_ascii_case(profile.store_state.trim());

    let mut breakdown = TaxBreakdown {
        lines: Vec::with_capacity(items.len()),
        taxable_total: 0,
        cgst_total: 0,
        sgst_total: 0,
        igst_total: 0,
        tax_total: 0,
        intra_state,
    };

    for item in items {
        let line = line_tax(profile, item, intra_state)?;

        breakdown.taxable_total = checked_total(breakdown.taxable_total, line.taxable_amount)?;
        breakdown.cgst_total = checked_total(breakdown.cgst_total, line.cgst)?;
        breakdown.sgst_total = checked_total(breakdown.sgst_total, line.sgst)?;
        breakdown.igst_total = checked_total(breakdown.igst_total, line.igst)?;
        breakdown.tax_total = checked_total(breakdown.tax_total, line.total_tax)?;
        breakdown.lines.push(line);
    }

    Ok(breakdown)
}

fn checked_total(total: u64, amount: u64) -> Result<u64, TaxError> {
    total
        .checked_add(amount)
        .ok_or(TaxError::Money(MoneyMathError::Overflow))
}

fn line_tax(
    profile: &StoreTaxProfile,
    item: &TaxableItem,
    intra_state: bool,
) -> Result<TaxLine, TaxError> {
    let gross = item
        .unit_price
        .checked_mul(u64::from(item.quantity))
        .ok_or(MoneyMathError::Overflow)?;

    if !profile.enabled {
        return Ok(TaxLine {
            taxable_amount: gross,
            rate: Decimal::ZERO,
            cgst: 0,
            sgst: 0,
            igst: 0,
            total_tax: 0,
        });
    }

    let rate = item.rate_override.unwrap_or(profile.default_rate);

    let (taxable_amount, total_tax) = if profile.price_includes_tax {
        let base = inclusive_base(gross, rate)?;

        (base, gross - base)
    } else {
        (gross, percent_of_minor(rate, gross)?)
    };

    // Split the total rather than rounding each half, so the halves always
    // sum back to the line total.
    let (cgst, sgst, igst) = if intra_state {
        let half = total_tax / 2;

        (half, total_tax - half, 0)
    } else {
        (0, 0, total_tax)
    };

    Ok(TaxLine {
        taxable_amount,
        rate,
        cgst,
        sgst,
        igst,
        total_tax,
    })
}
