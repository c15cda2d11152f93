//! Haberdash Domain Concerns

pub mod checkout;
pub mod coupons;
pub mod orders;
pub mod tax;
