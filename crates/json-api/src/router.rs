//! App Router

use salvo::Router;

use crate::{healthcheck, payments, tax};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("tax/calculate").post(tax::calculate::handler))
        .push(Router::with_path("payments/verify").post(payments::verify::handler))
}
