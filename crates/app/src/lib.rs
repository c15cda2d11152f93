//! Shared application domain and persistence modules for the Haberdash
//! storefront: coupons, orders, tax settings, the payment gateway adapter,
//! and transactional mail.

pub mod context;
pub mod database;
pub mod domain;
pub mod gateway;
pub mod mail;
pub mod uuids;

#[cfg(test)]
mod test;
