//! Order repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use minimart_core::{OrderId, OrderStatus, PaymentStatus, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem, ShippingAddress};

/// Database row for an order.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    items: Json<Vec<OrderItem>>,
    total_amount: Decimal,
    shipping_address: Json<ShippingAddress>,
    payment_method: String,
    order_status: String,
    payment_status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let order_status = row.order_status.parse::<OrderStatus>().map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "order {} has unknown status {:?}",
                row.id, row.order_status
            ))
        })?;
        let payment_status = row.payment_status.parse::<PaymentStatus>().map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "order {} has unknown payment status {:?}",
                row.id, row.payment_status
            ))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            items: row.items.0,
            total_amount: row.total_amount,
            shipping_address: row.shipping_address.0,
            payment_method: row.payment_method,
            order_status,
            payment_status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const ORDER_COLUMNS: &str = "id, user_id, items, total_amount, shipping_address, \
     payment_method, order_status, payment_status, created_at, updated_at";

/// Repository for order persistence operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new repository backed by `pool`.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All orders placed by `user_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// One order, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn get_for_user(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE id = $1 AND user_id = $2"
        ))
        .bind(order_id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    /// Persist a new order with default Processing/Pending statuses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn create(
        &self,
        user_id: UserId,
        items: &[OrderItem],
        total_amount: Decimal,
        shipping_address: &ShippingAddress,
        payment_method: &str,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders
                 (user_id, items, total_amount, shipping_address, payment_method)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(user_id.as_i32())
        .bind(Json(items))
        .bind(total_amount)
        .bind(Json(shipping_address))
        .bind(payment_method)
        .fetch_one(self.pool)
        .await?;

        Order::try_from(row)
    }

    /// Set the fulfilment status of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn set_status(
        &self,
        order_id: OrderId,
        user_id: UserId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders
             SET order_status = $3, updated_at = now()
             WHERE id = $1 AND user_id = $2
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order_id.as_i32())
        .bind(user_id.as_i32())
        .bind(status.to_string())
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    /// Set the payment status of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn set_payment_status(
        &self,
        order_id: OrderId,
        user_id: UserId,
        status: PaymentStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders
             SET payment_status = $3, updated_at = now()
             WHERE id = $1 AND user_id = $2
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order_id.as_i32())
        .bind(user_id.as_i32())
        .bind(status.to_string())
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    /// Cancel an order, only while it is still Processing.
    ///
    /// The status check happens in the same statement as the write, so two
    /// racing cancels (or a cancel racing a ship) cannot both win. Returns
    /// `None` if the order is absent or not in a cancellable state; callers
    /// distinguish the two with [`Self::get_for_user`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn cancel(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders
             SET order_status = $3, updated_at = now()
             WHERE id = $1 AND user_id = $2 AND order_status = $4
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order_id.as_i32())
        .bind(user_id.as_i32())
        .bind(OrderStatus::Cancelled.to_string())
        .bind(OrderStatus::Processing.to_string())
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }
}
