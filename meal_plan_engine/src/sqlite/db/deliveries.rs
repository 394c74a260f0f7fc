use chrono::{NaiveDate, Utc};
use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{Delivery, DeliveryStatus, NewDelivery};

pub async fn insert_delivery(delivery: NewDelivery, conn: &mut SqliteConnection) -> Result<Delivery, sqlx::Error> {
    let now = Utc::now();
    let delivery: Delivery = sqlx::query_as(
        r#"
            INSERT INTO deliveries (
                order_id,
                delivery_date,
                meal_type,
                customer_response,
                delivery_status,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *;
        "#,
    )
    .bind(delivery.order_id)
    .bind(delivery.delivery_date)
    .bind(delivery.meal_type)
    .bind(delivery.customer_response)
    .bind(DeliveryStatus::Scheduled)
    .bind(now)
    .fetch_one(conn)
    .await?;
    let Delivery { id, order_id, delivery_date, .. } = &delivery;
    debug!("🗃️ Delivery #{id} scheduled for order #{order_id} on {delivery_date}");
    Ok(delivery)
}

pub async fn fetch_delivery(id: i64, conn: &mut SqliteConnection) -> Result<Option<Delivery>, sqlx::Error> {
    let delivery = sqlx::query_as("SELECT * FROM deliveries WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(delivery)
}

pub async fn fetch_deliveries_for_order(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Delivery>, sqlx::Error> {
    let deliveries = sqlx::query_as("SELECT * FROM deliveries WHERE order_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(deliveries)
}

pub async fn fetch_deliveries_for_date(
    date: NaiveDate,
    conn: &mut SqliteConnection,
) -> Result<Vec<Delivery>, sqlx::Error> {
    let deliveries =
        sqlx::query_as("SELECT * FROM deliveries WHERE delivery_date = $1 ORDER BY created_at DESC, id DESC")
            .bind(date)
            .fetch_all(conn)
            .await?;
    Ok(deliveries)
}

/// Sets the delivery status. `delivered_at` is stamped when the status becomes `delivered`, and left alone otherwise.
pub async fn update_delivery_status(
    id: i64,
    status: DeliveryStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<Delivery>, sqlx::Error> {
    let now = Utc::now();
    let delivered_at = (status == DeliveryStatus::Delivered).then_some(now);
    let delivery = sqlx::query_as(
        r#"
            UPDATE deliveries SET
                delivery_status = $1,
                delivered_at = COALESCE($2, delivered_at),
                updated_at = $3
            WHERE id = $4
            RETURNING *;
        "#,
    )
    .bind(status)
    .bind(delivered_at)
    .bind(now)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(delivery)
}
