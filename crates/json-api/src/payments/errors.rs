//! Payment Endpoint Errors

use salvo::http::StatusError;
use tracing::error;

use haberdash_app::domain::{checkout::CheckoutServiceError, orders::OrdersServiceError};

pub(crate) fn into_status_error(error: CheckoutServiceError) -> StatusError {
    match error {
        // A mismatch is a client-visible rejection, not a server fault. The
        // brief stays generic so callers learn nothing about the secret.
        CheckoutServiceError::SignatureMismatch => {
            StatusError::bad_request().brief("Payment verification failed")
        }
        CheckoutServiceError::Orders(OrdersServiceError::NotFound) => {
            StatusError::not_found().brief("Order not found")
        }
        CheckoutServiceError::Orders(OrdersServiceError::NotPending) => {
            StatusError::conflict().brief("Order payment is no longer pending")
        }
        CheckoutServiceError::Orders(source) => {
            error!("failed to settle order: {source}");

            StatusError::internal_server_error()
        }
        CheckoutServiceError::Gateway(source) => {
            error!("payment gateway call failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
