//! Coupon Models

use haberdash::discounts::DiscountType;
use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::uuids::TypedUuid;

/// Coupon UUID
pub type CouponUuid = TypedUuid<Coupon>;

/// Coupon Model
#[derive(Debug, Clone)]
pub struct Coupon {
    pub uuid: CouponUuid,
    /// Stored uppercase; lookups uppercase the input first.
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub active: bool,
    pub expires_at: Option<Timestamp>,
    pub usage_limit: Option<u32>,
    pub usage_count: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Why a coupon cannot currently be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponRejection {
    /// The coupon is switched off.
    Inactive,

    /// `expires_at` is in the past.
    Expired,

    /// `usage_count` has reached `usage_limit`.
    Exhausted,
}

impl Coupon {
    /// Check whether the coupon is applicable at `now`.
    ///
    /// # Errors
    ///
    /// Returns the first applicable [`CouponRejection`], checked in the
    /// order inactive, expired, exhausted.
    pub fn check(&self, now: Timestamp) -> Result<(), CouponRejection> {
        if !self.active {
            return Err(CouponRejection::Inactive);
        }

        if self.expires_at.is_some_and(|expires_at| expires_at <= now) {
            return Err(CouponRejection::Expired);
        }

        if self
            .usage_limit
            .is_some_and(|limit| self.usage_count >= limit)
        {
            return Err(CouponRejection::Exhausted);
        }

        Ok(())
    }
}

/// New Coupon Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub expires_at: Option<Timestamp>,
    pub usage_limit: Option<u32>,
}

/// A validated coupon together with the discount it grants.
#[derive(Debug, Clone)]
pub struct CouponApplication {
    pub coupon: Coupon,
    /// Discount in paise, already clamped to the cart total.
    pub discount: u64,
}
