//! Tax settings and calculation

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::TaxServiceError;
pub use service::*;
