//! Tax service errors.

use haberdash::tax::TaxError;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxServiceError {
    #[error(transparent)]
    Tax(#[from] TaxError),

    #[error("invalid data")]
    InvalidData,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for TaxServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(
                ErrorKind::UniqueViolation | ErrorKind::ForeignKeyViolation | ErrorKind::Other | _,
            )
            | None => Self::Sql(error),
        }
    }
}
