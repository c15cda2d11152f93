//! Checkout service errors.

use thiserror::Error;

use crate::{domain::orders::errors::OrdersServiceError, gateway::GatewayError};

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    /// The provided signature does not match the stored secret. A business
    /// outcome, not a transport failure: the order is marked failed first.
    #[error("payment signature verification failed")]
    SignatureMismatch,

    #[error(transparent)]
    Orders(#[from] OrdersServiceError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
