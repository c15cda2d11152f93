//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::orders::models::{
    Order, OrderStatus, OrderUuid, PaymentStatus, ShippingAddress,
};

const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const SETTLE_PAYMENT_SQL: &str = include_str!("../sql/settle_payment.sql");
const MARK_PAYMENT_FAILED_SQL: &str = include_str!("../sql/mark_payment_failed.sql");
const SET_GATEWAY_ORDER_SQL: &str = include_str!("../sql/set_gateway_order.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Mark the order paid and processing, guarded by `payment_status =
    /// 'pending'` so a settled order can never be settled twice.
    pub(crate) async fn settle_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        payment_method: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SETTLE_PAYMENT_SQL)
            .bind(order.into_uuid())
            .bind(payment_method)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn mark_payment_failed(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        note: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_PAYMENT_FAILED_SQL)
            .bind(order.into_uuid())
            .bind(note)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn set_gateway_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        gateway_order_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_GATEWAY_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(gateway_order_id)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let total_amount = try_get_amount(row, "total_amount")?;

        let order_status = parse_status::<OrderStatus>(row, "order_status")?;
        let payment_status = parse_status::<PaymentStatus>(row, "payment_status")?;

        // The address join is nullable as a whole; recipient doubles as the
        // presence marker.
        let shipping_address = row
            .try_get::<Option<String>, _>("address_recipient")?
            .map(|recipient| {
                Ok::<_, sqlx::Error>(ShippingAddress {
                    recipient,
                    line1: row.try_get("address_line1")?,
                    line2: row.try_get("address_line2")?,
                    city: row.try_get("address_city")?,
                    state: row.try_get("address_state")?,
                    postal_code: row.try_get("address_postal_code")?,
                })
            })
            .transpose()?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: row.try_get("order_number")?,
            user_uuid: row.try_get("user_uuid")?,
            guest_token: row.try_get("guest_token")?,
            email: row.try_get("email")?,
            order_status,
            payment_status,
            payment_method: row.try_get("payment_method")?,
            payment_note: row.try_get("payment_note")?,
            gateway_order_id: row.try_get("gateway_order_id")?,
            total_amount,
            shipping_address,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

fn parse_status<S>(row: &PgRow, col: &str) -> Result<S, sqlx::Error>
where
    S: std::str::FromStr,
    S::Err: std::error::Error + Send + Sync + 'static,
{
    row.try_get::<String, _>(col)?
        .parse::<S>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: col.to_string(),
            source: Box::new(e),
        })
}

pub(super) fn try_get_amount(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount_i64: i64 = row.try_get(col)?;

    u64::try_from(amount_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
