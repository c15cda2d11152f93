//! Minor-unit money helpers.
//!
//! All amounts in the system are integers in minor units (paise). Rates and
//! percentages are [`Decimal`] values such as `18` for 18%. Helpers here do
//! the Decimal round-trips so callers never touch floating point.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::ToPrimitive,
};
use rusty_money::{Money, iso};
use thiserror::Error;

/// Errors raised by minor-unit arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyMathError {
    /// A Decimal multiplication or division overflowed.
    #[error("amount arithmetic overflowed or was not representable")]
    Overflow,

    /// The result could not be converted back to whole minor units.
    #[error("amount could not be converted to minor units")]
    Conversion,
}

/// Calculate `percent`% of `minor`, rounded half away from zero.
///
/// # Errors
///
/// - [`MoneyMathError::Overflow`] when the multiplication leaves the Decimal range.
/// - [`MoneyMathError::Conversion`] when the rounded result does not fit in `u64`.
pub fn percent_of_minor(percent: Decimal, minor: u64) -> Result<u64, MoneyMathError> {
    Decimal::from(minor)
        .checked_mul(percent)
        .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(MoneyMathError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(MoneyMathError::Conversion)
}

/// Back out the pre-tax base from a tax-inclusive gross amount.
///
/// `base = gross / (1 + rate / 100)`, rounded half away from zero. Used when
/// the store lists prices with GST already included.
///
/// # Errors
///
/// - [`MoneyMathError::Overflow`] when the divisor arithmetic leaves the Decimal range.
/// - [`MoneyMathError::Conversion`] when the rounded result does not fit in `u64`.
pub fn inclusive_base(gross: u64, rate: Decimal) -> Result<u64, MoneyMathError> {
    let divisor = Decimal::ONE
        .checked_add(
            rate.checked_div(Decimal::ONE_HUNDRED)
                .ok_or(MoneyMathError::Overflow)?,
        )
        .ok_or(MoneyMathError::Overflow)?;

    Decimal::from(gross)
        .checked_div(divisor)
        .ok_or(MoneyMathError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(MoneyMathError::Conversion)
}

/// Format a paise amount as Indian rupees, e.g. `₹1,234.56`.
///
/// # Errors
///
/// - [`MoneyMathError::Conversion`] when the amount exceeds `i64::MAX` paise.
pub fn format_inr(minor: u64) -> Result<String, MoneyMathError> {
    let minor = i64::try_from(minor).map_err(|_overflow| MoneyMathError::Conversion)?;

    Ok(Money::from_minor(minor, iso::INR).to_string())
}
