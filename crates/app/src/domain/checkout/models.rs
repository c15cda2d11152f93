//! Checkout Models

use crate::domain::orders::models::OrderUuid;

/// Payment method recorded on orders settled through the gateway.
pub const PAYMENT_METHOD_RAZORPAY: &str = "razorpay";

/// Inbound payment verification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyPayment {
    pub order_uuid: OrderUuid,
    pub gateway_order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// Outcome of a successful settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledOrder {
    pub order_uuid: OrderUuid,
    pub order_number: String,
}
