use chrono::{DateTime, Utc};
use cko_common::Amount;
use log::{debug, trace};
use sqlx::{sqlite::SqliteRow, FromRow, Row, SqliteConnection};

use super::is_unique_violation;
use crate::{
    db_types::{NewOrder, Order, OrderId, OrderItem, OrderStatusType, PaymentReference, UserId},
    traits::CheckoutDatabaseError,
};

impl FromRow<'_, SqliteRow> for Order {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let items: String = row.try_get("items")?;
        let items = serde_json::from_str::<Vec<OrderItem>>(&items)
            .map_err(|e| sqlx::Error::ColumnDecode { index: "items".into(), source: Box::new(e) })?;
        let total: f64 = row.try_get("total")?;
        let total = Amount::try_from(total)
            .map_err(|e| sqlx::Error::ColumnDecode { index: "total".into(), source: Box::new(e) })?;
        let status: String = row.try_get("status")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;
        Ok(Self {
            id: OrderId(row.try_get("id")?),
            user_id: UserId(row.try_get("user_id")?),
            items,
            total,
            status: OrderStatusType::from(status),
            payment_reference: PaymentReference(row.try_get("payment_reference")?),
            created_at,
        })
    }
}

/// Inserts a new order using the given connection. This is not atomic on its own; pass `&mut *tx` to embed the call in
/// a transaction.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, CheckoutDatabaseError> {
    let items = serde_json::to_string(&order.items).map_err(|e| CheckoutDatabaseError::CorruptRecord(e.to_string()))?;
    let order_id = order.id.clone();
    // RETURNING rows are drained with fetch_all so the INSERT has finished before the caller commits
    let result: Result<Order, sqlx::Error> = sqlx::query_as(
        r#"
            INSERT INTO orders (
                id,
                user_id,
                items,
                total,
                status,
                payment_reference,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *;
        "#,
    )
    .bind(order.id.as_str())
    .bind(order.user_id.as_str())
    .bind(items)
    .bind(order.total.value())
    .bind(order.status.to_string())
    .bind(order.payment_reference.as_str())
    .bind(order.created_at)
    .fetch_all(conn)
    .await
    .and_then(|rows| rows.into_iter().next().ok_or(sqlx::Error::RowNotFound));
    match result {
        Ok(order) => {
            debug!("🗃️ Order [{order_id}] inserted");
            Ok(order)
        },
        Err(e) if is_unique_violation(&e) => Err(CheckoutDatabaseError::OrderAlreadyExists(order_id)),
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_order_by_id(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

/// Fetches every order for the user, newest first. Orders created in the same instant come out in reverse insertion
/// order.
pub async fn fetch_orders_for_user(user_id: &UserId, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders: Vec<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC, rowid DESC")
            .bind(user_id.as_str())
            .fetch_all(conn)
            .await?;
    trace!("🗃️ Fetched {} orders for user {user_id}", orders.len());
    Ok(orders)
}
