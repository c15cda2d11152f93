//! Depot helpers.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

/// Fetch injected shared state, mapping a missing entry to a 500.
///
/// The state is injected by the affix middleware at startup; a miss means
/// the router was assembled without it.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_missing| StatusError::internal_server_error())
    }
}
