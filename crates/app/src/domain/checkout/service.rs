//! Checkout service.
//!
//! Orchestrates order settlement: gateway order creation before payment, and
//! signature-checked settlement afterwards. Confirmation mail is best-effort;
//! a paid order is never rolled back because the provider was down.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::warn;

use crate::{
    domain::{
        checkout::{
            errors::CheckoutServiceError,
            models::{PAYMENT_METHOD_RAZORPAY, SettledOrder, VerifyPayment},
        },
        orders::{
            errors::OrdersServiceError,
            models::{OrderUuid, PaymentStatus},
            service::OrdersService,
        },
    },
    gateway::{GatewayOrder, PaymentGateway},
    mail::Mailer,
};

#[derive(Clone)]
pub struct GatewayCheckoutService {
    orders: Arc<dyn OrdersService>,
    gateway: Arc<dyn PaymentGateway>,
    mailer: Arc<dyn Mailer>,
}

impl GatewayCheckoutService {
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrdersService>,
        gateway: Arc<dyn PaymentGateway>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            orders,
            gateway,
            mailer,
        }
    }
}

#[async_trait]
impl CheckoutService for GatewayCheckoutService {
    async fn create_payment_order(
        &self,
        order_uuid: OrderUuid,
    ) -> Result<GatewayOrder, CheckoutServiceError> {
        let order = self.orders.get_order(order_uuid).await?;

        let gateway_order = self
            .gateway
            .create_order(order.total_amount, &order.order_number)
            .await?;

        self.orders
            .set_gateway_order(order_uuid, &gateway_order.gateway_order_id)
            .await?;

        Ok(gateway_order)
    }

    async fn verify_payment(
        &self,
        request: VerifyPayment,
    ) -> Result<SettledOrder, CheckoutServiceError> {
        let mut order = self.orders.get_order(request.order_uuid).await?;

        let verified = self.gateway.verify_signature(
            &request.gateway_order_id,
            &request.payment_id,
            &request.signature,
        )?;

        if !verified {
            let note = format!(
                "signature mismatch for payment {} against gateway order {}",
                request.payment_id, request.gateway_order_id
            );

            // Only a pending order records the failure; a replayed callback
            // against a settled order must leave it untouched.
            match self.orders.mark_payment_failed(order.uuid, &note).await {
                Ok(()) | Err(OrdersServiceError::NotPending) => {}
                Err(error) => return Err(error.into()),
            }

            return Err(CheckoutServiceError::SignatureMismatch);
        }

        self.orders
            .settle_payment(order.uuid, PAYMENT_METHOD_RAZORPAY)
            .await?;

        order.payment_status = PaymentStatus::Paid;

        if let Err(error) = self.mailer.send_order_confirmation(&order).await {
            warn!(
                "failed to send confirmation for order {}: {error}",
                order.order_number
            );
        }

        Ok(SettledOrder {
            order_uuid: order.uuid,
            order_number: order.order_number,
        })
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Create the gateway-side order for a pending internal order.
    async fn create_payment_order(
        &self,
        order_uuid: OrderUuid,
    ) -> Result<GatewayOrder, CheckoutServiceError>;

    /// Reconcile a gateway callback against the stored order and settle it.
    async fn verify_payment(
        &self,
        request: VerifyPayment,
    ) -> Result<SettledOrder, CheckoutServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::{
        domain::orders::{
            errors::OrdersServiceError,
            models::{Order, OrderStatus},
            service::MockOrdersService,
        },
        gateway::MockPaymentGateway,
        mail::{MailError, MockMailer},
    };

    use super::*;

    fn pending_order(uuid: OrderUuid) -> Order {
        Order {
            uuid,
            order_number: "HB-1001".to_string(),
            user_uuid: None,
            guest_token: None,
            email: "customer@example.com".to_string(),
            order_status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            payment_note: None,
            gateway_order_id: Some("order_abc".to_string()),
            total_amount: 100_000,
            shipping_address: None,
            items: Vec::new(),
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        }
    }

    fn verify_request(uuid: OrderUuid) -> VerifyPayment {
        VerifyPayment {
            order_uuid: uuid,
            gateway_order_id: "order_abc".to_string(),
            payment_id: "pay_xyz".to_string(),
            signature: "aa".repeat(32),
        }
    }

    fn service(
        orders: MockOrdersService,
        gateway: MockPaymentGateway,
        mailer: MockMailer,
    ) -> GatewayCheckoutService {
        GatewayCheckoutService::new(Arc::new(orders), Arc::new(gateway), Arc::new(mailer))
    }

    #[tokio::test]
    async fn valid_signature_settles_and_mails() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();
        orders
            .expect_get_order()
            .once()
            .withf(move |u| *u == uuid)
            .return_once(move |_| Ok(pending_order(uuid)));
        orders
            .expect_settle_payment()
            .once()
            .withf(move |u, method| *u == uuid && method == PAYMENT_METHOD_RAZORPAY)
            .return_once(|_, _| Ok(()));
        orders.expect_mark_payment_failed().never();

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_verify_signature()
            .once()
            .withf(|order_id, payment_id, _| order_id == "order_abc" && payment_id == "pay_xyz")
            .return_once(|_, _, _| Ok(true));

        let mut mailer = MockMailer::new();
        mailer
            .expect_send_order_confirmation()
            .once()
            .withf(|order| order.payment_status == PaymentStatus::Paid)
            .return_once(|_| Ok(()));

        let settled = service(orders, gateway, mailer)
            .verify_payment(verify_request(uuid))
            .await?;

        assert_eq!(settled.order_uuid, uuid);
        assert_eq!(settled.order_number, "HB-1001");

        Ok(())
    }

    #[tokio::test]
    async fn mismatched_signature_marks_failed_and_sends_no_mail() {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();
        orders
            .expect_get_order()
            .once()
            .return_once(move |_| Ok(pending_order(uuid)));
        orders
            .expect_mark_payment_failed()
            .once()
            .withf(move |u, note| *u == uuid && note.contains("pay_xyz"))
            .return_once(|_, _| Ok(()));
        orders.expect_settle_payment().never();

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_verify_signature()
            .once()
            .return_once(|_, _, _| Ok(false));

        let mut mailer = MockMailer::new();
        mailer.expect_send_order_confirmation().never();

        let result = service(orders, gateway, mailer)
            .verify_payment(verify_request(uuid))
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::SignatureMismatch)),
            "expected SignatureMismatch, got {result:?}"
        );
    }

    #[tokio::test]
    async fn bad_signature_replay_leaves_a_paid_order_untouched() {
        let uuid = OrderUuid::new();

        let mut paid = pending_order(uuid);
        paid.order_status = OrderStatus::Processing;
        paid.payment_status = PaymentStatus::Paid;

        let mut orders = MockOrdersService::new();
        orders
            .expect_get_order()
            .once()
            .return_once(move |_| Ok(paid));
        // The guarded UPDATE matches nothing for a paid order; the mismatch
        // branch must swallow that instead of corrupting the order.
        orders
            .expect_mark_payment_failed()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotPending));
        orders.expect_settle_payment().never();

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_verify_signature()
            .once()
            .return_once(|_, _, _| Ok(false));

        let mut mailer = MockMailer::new();
        mailer.expect_send_order_confirmation().never();

        let result = service(orders, gateway, mailer)
            .verify_payment(verify_request(uuid))
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::SignatureMismatch)),
            "expected SignatureMismatch, got {result:?}"
        );
    }

    #[tokio::test]
    async fn unknown_order_surfaces_not_found_without_touching_the_gateway() {
        let mut orders = MockOrdersService::new();
        orders
            .expect_get_order()
            .once()
            .return_once(|_| Err(OrdersServiceError::NotFound));
        orders.expect_settle_payment().never();
        orders.expect_mark_payment_failed().never();

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_verify_signature().never();

        let mut mailer = MockMailer::new();
        mailer.expect_send_order_confirmation().never();

        let result = service(orders, gateway, mailer)
            .verify_payment(verify_request(OrderUuid::new()))
            .await;

        assert!(
            matches!(
                result,
                Err(CheckoutServiceError::Orders(OrdersServiceError::NotFound))
            ),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn mail_failure_does_not_fail_settlement() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();
        orders
            .expect_get_order()
            .once()
            .return_once(move |_| Ok(pending_order(uuid)));
        orders
            .expect_settle_payment()
            .once()
            .return_once(|_, _| Ok(()));

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_verify_signature()
            .once()
            .return_once(|_, _, _| Ok(true));

        let mut mailer = MockMailer::new();
        mailer
            .expect_send_order_confirmation()
            .once()
            .return_once(|_| {
                Err(MailError::Rejected {
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                })
            });

        let settled = service(orders, gateway, mailer)
            .verify_payment(verify_request(uuid))
            .await?;

        assert_eq!(settled.order_number, "HB-1001");

        Ok(())
    }

    #[tokio::test]
    async fn create_payment_order_stores_the_gateway_id() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();
        orders
            .expect_get_order()
            .once()
            .return_once(move |_| Ok(pending_order(uuid)));
        orders
            .expect_set_gateway_order()
            .once()
            .withf(move |u, id| *u == uuid && id == "order_new")
            .return_once(|_, _| Ok(()));

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_order()
            .once()
            .withf(|amount, receipt| *amount == 100_000 && receipt == "HB-1001")
            .return_once(|amount, _| {
                Ok(GatewayOrder {
                    gateway_order_id: "order_new".to_string(),
                    amount,
                    currency: "INR".to_string(),
                })
            });

        let mut mailer = MockMailer::new();
        mailer.expect_send_order_confirmation().never();

        let gateway_order = service(orders, gateway, mailer)
            .create_payment_order(uuid)
            .await?;

        assert_eq!(gateway_order.gateway_order_id, "order_new");
        assert_eq!(gateway_order.amount, 100_000);

        Ok(())
    }

    #[tokio::test]
    async fn already_settled_order_cannot_be_settled_again() {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();
        orders
            .expect_get_order()
            .once()
            .return_once(move |_| Ok(pending_order(uuid)));
        orders
            .expect_settle_payment()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotPending));

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_verify_signature()
            .once()
            .return_once(|_, _, _| Ok(true));

        let mut mailer = MockMailer::new();
        mailer.expect_send_order_confirmation().never();

        let result = service(orders, gateway, mailer)
            .verify_payment(verify_request(uuid))
            .await;

        assert!(
            matches!(
                result,
                Err(CheckoutServiceError::Orders(OrdersServiceError::NotPending))
            ),
            "expected NotPending, got {result:?}"
        );
    }
}
