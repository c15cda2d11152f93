//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};

use haberdash_app::{
    context::AppContext,
    domain::{checkout::MockCheckoutService, coupons::MockCouponsService, tax::MockTaxService},
};

use crate::state::State;

fn strict_coupons_mock() -> MockCouponsService {
    let mut coupons = MockCouponsService::new();

    coupons.expect_validate_coupon().never();
    coupons.expect_redeem_coupon().never();
    coupons.expect_create_coupon().never();

    coupons
}

fn strict_tax_mock() -> MockTaxService {
    let mut tax = MockTaxService::new();

    tax.expect_calculate().never();
    tax.expect_get_settings().never();
    tax.expect_ensure_default_settings().never();
    tax.expect_set_category_rule().never();

    tax
}

fn strict_checkout_mock() -> MockCheckoutService {
    let mut checkout = MockCheckoutService::new();

    checkout.expect_create_payment_order().never();
    checkout.expect_verify_payment().never();

    checkout
}

pub(crate) fn state_with_tax(tax: MockTaxService) -> Arc<State> {
    Arc::new(State::new(AppContext {
        coupons: Arc::new(strict_coupons_mock()),
        tax: Arc::new(tax),
        checkout: Arc::new(strict_checkout_mock()),
    }))
}

pub(crate) fn state_with_checkout(checkout: MockCheckoutService) -> Arc<State> {
    Arc::new(State::new(AppContext {
        coupons: Arc::new(strict_coupons_mock()),
        tax: Arc::new(strict_tax_mock()),
        checkout: Arc::new(checkout),
    }))
}

pub(crate) fn tax_service(tax: MockTaxService, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state_with_tax(tax))).push(route))
}

pub(crate) fn checkout_service(checkout: MockCheckoutService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_checkout(checkout)))
            .push(route),
    )
}
