//! Pure checkout arithmetic for the Haberdash storefront.
//!
//! Everything in this crate is synchronous and side-effect free: GST
//! breakdowns, coupon discount amounts, and minor-unit money helpers.
//! Persistence and transport live in `haberdash-app` and `haberdash-json`.

pub mod discounts;
pub mod money;
pub mod tax;
