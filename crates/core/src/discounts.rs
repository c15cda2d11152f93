//! Coupon discount arithmetic.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::ToPrimitive,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::{MoneyMathError, percent_of_minor};

/// How a coupon's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Value is a percentage of the cart subtotal, e.g. `10` for 10% off.
    Percentage,

    /// Value is a flat rupee amount, e.g. `10` for ₹10 off.
    Fixed,
}

impl DiscountType {
    /// Stable storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

/// Error for an unrecognised [`DiscountType`] representation.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown discount type `{0}`")]
pub struct ParseDiscountTypeError(String);

impl std::str::FromStr for DiscountType {
    type Err = ParseDiscountTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "percentage" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            other => Err(ParseDiscountTypeError(other.to_string())),
        }
    }
}

/// Errors raised while computing a discount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Wrapped minor-unit arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyMathError),
}

/// Compute the discount a coupon grants against a cart subtotal in paise.
///
/// Fixed values are rupee amounts and are converted to paise before clamping.
/// The result never exceeds the subtotal.
///
/// # Errors
///
/// - [`DiscountError::Money`] when the percentage or rupee conversion overflows.
pub fn discount_amount(
    discount_type: DiscountType,
    value: Decimal,
    subtotal: u64,
) -> Result<u64, DiscountError> {
    let raw = match discount_type {
        DiscountType::Percentage => percent_of_minor(value, subtotal)?,
        DiscountType::Fixed => value
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(MoneyMathError::Overflow)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
            .ok_or(MoneyMathError::Conversion)?,
    };

    Ok(raw.min(subtotal))
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn percentage_discount_of_subtotal() -> TestResult {
        // 10% of ₹1000.00
        assert_eq!(
            discount_amount(DiscountType::Percentage, dec!(10), 100_000)?,
            10_000
        );

        Ok(())
    }

    #[test]
    fn fixed_discount_converts_rupees_to_paise() -> TestResult {
        // ₹10 off a ₹1000.00 cart
        assert_eq!(
            discount_amount(DiscountType::Fixed, dec!(10), 100_000)?,
            1_000
        );

        Ok(())
    }

    #[test]
    fn fixed_discount_never_exceeds_subtotal() -> TestResult {
        // ₹50 off a ₹20.00 cart clamps to the subtotal
        assert_eq!(discount_amount(DiscountType::Fixed, dec!(50), 2_000)?, 2_000);

        Ok(())
    }

    #[test]
    fn percentage_above_one_hundred_clamps_to_subtotal() -> TestResult {
        assert_eq!(
            discount_amount(DiscountType::Percentage, dec!(250), 4_000)?,
            4_000
        );

        Ok(())
    }

    #[test]
    fn zero_value_discounts_nothing() -> TestResult {
        assert_eq!(
            discount_amount(DiscountType::Fixed, Decimal::ZERO, 4_000)?,
            0
        );

        Ok(())
    }
}
