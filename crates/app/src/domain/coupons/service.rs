//! Coupons service.

use async_trait::async_trait;
use haberdash::discounts::discount_amount;
use jiff::Timestamp;
use mockall::automock;

use crate::{
    database::Db,
    domain::coupons::{
        errors::CouponsServiceError,
        models::{Coupon, CouponApplication, CouponRejection, NewCoupon},
        repository::PgCouponsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    repository: PgCouponsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCouponsRepository::new(),
        }
    }
}

#[async_trait]
impl CouponsService for PgCouponsService {
    async fn validate_coupon(
        &self,
        code: &str,
        cart_total: u64,
    ) -> Result<CouponApplication, CouponsServiceError> {
        let code = normalize_code(code)?;

        let mut tx = self.db.begin().await?;

        let coupon = self.repository.get_coupon_by_code(&mut tx, &code).await?;

        tx.commit().await?;

        coupon
            .check(Timestamp::now())
            .map_err(CouponsServiceError::from)?;

        let discount = discount_amount(coupon.discount_type, coupon.discount_value, cart_total)?;

        Ok(CouponApplication { coupon, discount })
    }

    async fn redeem_coupon(&self, code: &str) -> Result<(), CouponsServiceError> {
        let code = normalize_code(code)?;

        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.redeem_coupon(&mut tx, &code).await?;

        if rows_affected == 0 {
            // The guarded UPDATE matched nothing; re-read to report why.
            let coupon = self.repository.get_coupon_by_code(&mut tx, &code).await?;

            coupon
                .check(Timestamp::now())
                .map_err(CouponsServiceError::from)?;

            return Err(CouponsServiceError::Exhausted);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn create_coupon(&self, coupon: NewCoupon) -> Result<Coupon, CouponsServiceError> {
        let mut normalized = coupon;
        normalized.code = normalize_code(&normalized.code)?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_coupon(&mut tx, &normalized).await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Validate a coupon against a cart total in paise, without side effects.
    async fn validate_coupon(
        &self,
        code: &str,
        cart_total: u64,
    ) -> Result<CouponApplication, CouponsServiceError>;

    /// Consume one use of a coupon via a guarded, atomic increment.
    async fn redeem_coupon(&self, code: &str) -> Result<(), CouponsServiceError>;

    /// Create a new coupon.
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<Coupon, CouponsServiceError>;
}

impl From<CouponRejection> for CouponsServiceError {
    fn from(rejection: CouponRejection) -> Self {
        match rejection {
            CouponRejection::Inactive => Self::Inactive,
            CouponRejection::Expired => Self::Expired,
            CouponRejection::Exhausted => Self::Exhausted,
        }
    }
}

fn normalize_code(code: &str) -> Result<String, CouponsServiceError> {
    let code = code.trim();

    if code.is_empty() {
        return Err(CouponsServiceError::BlankCode);
    }

    Ok(code.to_uppercase())
}

#[cfg(test)]
mod tests {
    use haberdash::discounts::DiscountType;
    use rust_decimal::dec;
    use testresult::TestResult;

    use crate::{domain::coupons::models::CouponUuid, test::TestContext};

    use super::*;

    fn new_coupon(code: &str) -> NewCoupon {
        NewCoupon {
            uuid: CouponUuid::new(),
            code: code.to_string(),
            discount_type: DiscountType::Fixed,
            discount_value: dec!(10),
            expires_at: None,
            usage_limit: None,
        }
    }

    #[test]
    fn blank_code_is_rejected_before_lookup() {
        assert!(matches!(
            normalize_code("   "),
            Err(CouponsServiceError::BlankCode)
        ));
    }

    #[test]
    fn codes_are_uppercased_for_lookup() -> TestResult {
        assert_eq!(normalize_code(" save10 ")?, "SAVE10");

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn validate_applies_fixed_discount() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.coupons.create_coupon(new_coupon("SAVE10")).await?;

        // ₹1000.00 cart, ₹10 off
        let application = ctx.coupons.validate_coupon("save10", 100_000).await?;

        assert_eq!(application.discount, 1_000);
        assert_eq!(application.coupon.code, "SAVE10");

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn unknown_code_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.coupons.validate_coupon("NOPE", 100_000).await;

        assert!(
            matches!(result, Err(CouponsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn duplicate_code_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.coupons.create_coupon(new_coupon("TWICE")).await?;

        let result = ctx.coupons.create_coupon(new_coupon("TWICE")).await;

        assert!(
            matches!(result, Err(CouponsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn redeeming_past_the_limit_fails() -> TestResult {
        let ctx = TestContext::new().await;

        let mut coupon = new_coupon("ONCE");
        coupon.usage_limit = Some(1);

        ctx.coupons.create_coupon(coupon).await?;

        ctx.coupons.redeem_coupon("ONCE").await?;

        let result = ctx.coupons.redeem_coupon("ONCE").await;

        assert!(
            matches!(result, Err(CouponsServiceError::Exhausted)),
            "expected Exhausted, got {result:?}"
        );

        let result = ctx.coupons.validate_coupon("ONCE", 100_000).await;

        assert!(
            matches!(result, Err(CouponsServiceError::Exhausted)),
            "validation should also reject the exhausted coupon, got {result:?}"
        );

        Ok(())
    }
}
