//! Verify Payment Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use haberdash_app::domain::checkout::models::VerifyPayment;

use crate::{extensions::*, payments::errors::into_status_error, state::State};

/// Verify Payment Request
///
/// Field names follow the gateway's checkout callback payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    /// Hex HMAC-SHA256 signature supplied by the gateway
    pub razorpay_signature: String,
    /// Internal order UUID, carried through checkout as a hidden field
    pub order_id: Uuid,
}

impl From<VerifyPaymentRequest> for VerifyPayment {
    fn from(request: VerifyPaymentRequest) -> Self {
        VerifyPayment {
            order_uuid: request.order_id.into(),
            gateway_order_id: request.razorpay_order_id,
            payment_id: request.razorpay_payment_id,
            signature: request.razorpay_signature,
        }
    }
}

/// Payment Verified Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentVerifiedResponse {
    /// Settled order UUID
    pub order_id: Uuid,
    /// Human-facing order number for the confirmation page
    pub order_number: String,
}

/// Verify Payment Handler
#[endpoint(
    tags("payments"),
    summary = "Verify a gateway payment and settle the order",
    responses(
        (status_code = StatusCode::OK, description = "Payment verified, order settled"),
        (status_code = StatusCode::BAD_REQUEST, description = "Signature mismatch"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order payment no longer pending"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<VerifyPaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<PaymentVerifiedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let settled = state
        .app
        .checkout
        .verify_payment(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(PaymentVerifiedResponse {
        order_id: settled.order_uuid.into(),
        order_number: settled.order_number,
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use haberdash_app::domain::{
        checkout::{CheckoutServiceError, MockCheckoutService, models::SettledOrder},
        orders::{OrdersServiceError, models::OrderUuid},
    };

    use crate::test_helpers::checkout_service;

    use super::*;

    fn make_service(checkout: MockCheckoutService) -> Service {
        checkout_service(checkout, Router::with_path("payments/verify").post(handler))
    }

    fn verify_body(order_uuid: OrderUuid) -> serde_json::Value {
        json!({
            "razorpay_order_id": "order_AbC123",
            "razorpay_payment_id": "pay_XyZ789",
            "razorpay_signature": "deadbeef",
            "order_id": order_uuid.into_uuid(),
        })
    }

    #[tokio::test]
    async fn test_verify_success_returns_order_number() -> TestResult {
        let order_uuid = OrderUuid::new();

        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_verify_payment()
            .once()
            .withf(move |request| {
                request.order_uuid == order_uuid
                    && request.gateway_order_id == "order_AbC123"
                    && request.payment_id == "pay_XyZ789"
                    && request.signature == "deadbeef"
            })
            .return_once(move |_| {
                Ok(SettledOrder {
                    order_uuid,
                    order_number: "HB-1042".to_string(),
                })
            });

        let mut res = TestClient::post("http://example.com/payments/verify")
            .json(&verify_body(order_uuid))
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: PaymentVerifiedResponse = res.take_json().await?;

        assert_eq!(body.order_id, order_uuid.into_uuid());
        assert_eq!(body.order_number, "HB-1042");

        Ok(())
    }

    #[tokio::test]
    async fn test_verify_signature_mismatch_returns_400() -> TestResult {
        let order_uuid = OrderUuid::new();

        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_verify_payment()
            .once()
            .return_once(|_| Err(CheckoutServiceError::SignatureMismatch));

        let res = TestClient::post("http://example.com/payments/verify")
            .json(&verify_body(order_uuid))
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_verify_unknown_order_returns_404() -> TestResult {
        let order_uuid = OrderUuid::new();

        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_verify_payment()
            .once()
            .return_once(|_| Err(CheckoutServiceError::Orders(OrdersServiceError::NotFound)));

        let res = TestClient::post("http://example.com/payments/verify")
            .json(&verify_body(order_uuid))
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_verify_settled_order_returns_409() -> TestResult {
        let order_uuid = OrderUuid::new();

        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_verify_payment()
            .once()
            .return_once(|_| Err(CheckoutServiceError::Orders(OrdersServiceError::NotPending)));

        let res = TestClient::post("http://example.com/payments/verify")
            .json(&verify_body(order_uuid))
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
