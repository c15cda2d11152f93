//! Tax Endpoint Errors

use salvo::http::StatusError;
use tracing::error;

use haberdash::tax::TaxError;
use haberdash_app::domain::tax::TaxServiceError;

pub(crate) fn into_status_error(error: TaxServiceError) -> StatusError {
    match error {
        TaxServiceError::Tax(TaxError::NoItems) => {
            StatusError::bad_request().brief("Tax calculation requires at least one item")
        }
        TaxServiceError::Tax(TaxError::BlankCustomerState) => {
            StatusError::bad_request().brief("Customer state cannot be blank")
        }
        TaxServiceError::InvalidData | TaxServiceError::MissingRequiredData => {
            StatusError::bad_request().brief("Invalid tax calculation payload")
        }
        TaxServiceError::Tax(TaxError::Money(source)) => {
            error!("tax amount arithmetic failed: {source}");

            StatusError::internal_server_error()
        }
        TaxServiceError::Sql(source) => {
            error!("failed to load tax settings: {source}");

            StatusError::internal_server_error()
        }
    }
}
