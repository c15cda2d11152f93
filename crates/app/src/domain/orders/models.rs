//! Order Models

use jiff::Timestamp;
use thiserror::Error;
use uuid::Uuid;

use crate::uuids::TypedUuid;

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// Fulfilment status of an order.
///
/// `pending → processing → (shipped → delivered) | cancelled`; payment
/// settlement only ever advances `pending → processing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// Payment status of an order.
///
/// `pending → {paid, failed}`; `paid` is terminal for the settlement flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// Error for an unrecognised status representation.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} status `{value}`")]
pub struct ParseStatusError {
    kind: &'static str,
    value: String,
}

impl OrderStatus {
    /// Stable storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ParseStatusError {
                kind: "order",
                value: other.to_string(),
            }),
        }
    }
}

impl PaymentStatus {
    /// Stable storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = ParseStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            other => Err(ParseStatusError {
                kind: "payment",
                value: other.to_string(),
            }),
        }
    }
}

/// Order Model
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderUuid,
    /// Human-facing reference, e.g. `HB-10231`.
    pub order_number: String,
    pub user_uuid: Option<Uuid>,
    /// Cookie-held identifier for guest checkouts.
    pub guest_token: Option<String>,
    pub email: String,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    /// Failure note written when signature verification rejects a payment.
    pub payment_note: Option<String>,
    /// Gateway-side order id, set when the gateway order is created.
    pub gateway_order_id: Option<String>,
    /// Grand total in paise.
    pub total_amount: u64,
    pub shipping_address: Option<ShippingAddress>,
    pub items: Vec<OrderItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Shipping address attached to an order.
#[derive(Debug, Clone)]
pub struct ShippingAddress {
    pub recipient: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

/// OrderItem Model
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub variant_uuid: Uuid,
    pub name: String,
    pub quantity: u32,
    /// Unit price snapshot in paise, taken at checkout.
    pub unit_price: u64,
}
