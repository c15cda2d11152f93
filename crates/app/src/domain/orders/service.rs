//! Orders service.
//!
//! Orders are written by checkout and only ever status-transitioned after
//! that; nothing here deletes rows. Both transition operations are guarded
//! conditional UPDATEs so replays and races collapse to a rows-affected
//! check.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::orders::{
        errors::OrdersServiceError,
        models::{Order, OrderUuid},
        repositories::{PgOrderItemsRepository, PgOrdersRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn get_order(&self, uuid: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut order = self.orders_repository.get_order(&mut tx, uuid).await?;

        let items = self.items_repository.get_order_items(&mut tx, uuid).await?;

        tx.commit().await?;

        order.items = items;

        Ok(order)
    }

    async fn settle_payment(
        &self,
        uuid: OrderUuid,
        payment_method: &str,
    ) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .orders_repository
            .settle_payment(&mut tx, uuid, payment_method)
            .await?;

        if rows_affected == 0 {
            // Distinguish a missing order from one already past pending.
            self.orders_repository.get_order(&mut tx, uuid).await?;

            return Err(OrdersServiceError::NotPending);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn mark_payment_failed(
        &self,
        uuid: OrderUuid,
        note: &str,
    ) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .orders_repository
            .mark_payment_failed(&mut tx, uuid, note)
            .await?;

        if rows_affected == 0 {
            // Distinguish a missing order from one already past pending.
            self.orders_repository.get_order(&mut tx, uuid).await?;

            return Err(OrdersServiceError::NotPending);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn set_gateway_order(
        &self,
        uuid: OrderUuid,
        gateway_order_id: &str,
    ) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .orders_repository
            .set_gateway_order(&mut tx, uuid, gateway_order_id)
            .await?;

        if rows_affected == 0 {
            self.orders_repository.get_order(&mut tx, uuid).await?;

            return Err(OrdersServiceError::NotPending);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Retrieve an order with its items and shipping address.
    async fn get_order(&self, uuid: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Transition a pending order to paid/processing.
    ///
    /// Fails with [`OrdersServiceError::NotPending`] when the order has
    /// already been settled or failed.
    async fn settle_payment(
        &self,
        uuid: OrderUuid,
        payment_method: &str,
    ) -> Result<(), OrdersServiceError>;

    /// Record a payment failure note against a pending order.
    ///
    /// Fails with [`OrdersServiceError::NotPending`] when the order has
    /// already been settled or failed; `paid` is terminal.
    async fn mark_payment_failed(
        &self,
        uuid: OrderUuid,
        note: &str,
    ) -> Result<(), OrdersServiceError>;

    /// Attach the gateway-side order id to a pending order.
    async fn set_gateway_order(
        &self,
        uuid: OrderUuid,
        gateway_order_id: &str,
    ) -> Result<(), OrdersServiceError>;
}
