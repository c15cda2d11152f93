//! Tax Handlers

pub(crate) mod calculate;
