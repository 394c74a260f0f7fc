use chrono::Utc;
use log::{debug, trace};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{Customer, MealType, NewOrder, Order, OrderStatus},
    order_objects::OrderQueryFilter,
};

/// Inserts a new order into the database using the given connection. This is not atomic. You can embed this call
/// inside a transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
///
/// New orders are always `active`.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let now = Utc::now();
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                customer_id,
                meal_quantity,
                meal_split,
                total_amount,
                payment_order_ref,
                payment_id,
                payment_status,
                order_status,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *;
        "#,
    )
    .bind(order.customer_id)
    .bind(order.meal_quantity)
    .bind(order.meal_split)
    .bind(order.total_amount)
    .bind(order.payment_order_ref)
    .bind(order.payment_id)
    .bind(order.payment_status)
    .bind(OrderStatus::Active)
    .bind(now)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Order #{} inserted for customer #{}", order.id, order.customer_id);
    Ok(order)
}

pub async fn fetch_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

/// Distinct customers with an active order that still has meals left and covers the given meal slot.
pub async fn fetch_eligible_customers(
    meal_type: MealType,
    conn: &mut SqliteConnection,
) -> Result<Vec<Customer>, sqlx::Error> {
    let customers = sqlx::query_as(
        r#"
            SELECT * FROM customers WHERE id IN (
                SELECT customer_id FROM orders
                WHERE order_status = 'active' AND meal_quantity > 0 AND meal_split IN ($1, 'both')
            )
            ORDER BY id
        "#,
    )
    .bind(meal_type)
    .fetch_all(conn)
    .await?;
    Ok(customers)
}

/// The customer's most recently created active order, regardless of its remaining balance.
pub async fn fetch_latest_active_order(
    customer_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            SELECT * FROM orders
            WHERE customer_id = $1 AND order_status = 'active'
            ORDER BY created_at DESC, id DESC
            LIMIT 1
        "#,
    )
    .bind(customer_id)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

/// Fetches orders according to criteria specified in the `OrderQueryFilter`
///
/// Resulting orders are ordered by `created_at` in descending order
pub async fn search_orders(query: OrderQueryFilter, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM orders ");
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(customer_id) = query.customer_id {
        where_clause.push("customer_id = ");
        where_clause.push_bind_unseparated(customer_id);
    }
    if let Some(since) = query.since {
        where_clause.push("created_at >= ");
        where_clause.push_bind_unseparated(since);
    }
    if let Some(until) = query.until {
        where_clause.push("created_at <= ");
        where_clause.push_bind_unseparated(until);
    }
    if let Some(statuses) = query.status {
        if statuses.is_empty() {
            where_clause.push("1 = 0");
        } else {
            where_clause.push("order_status IN (");
            for (i, status) in statuses.into_iter().enumerate() {
                if i > 0 {
                    where_clause.push_unseparated(", ");
                }
                where_clause.push_bind_unseparated(status);
            }
            where_clause.push_unseparated(")");
        }
    }
    builder.push(" ORDER BY created_at DESC, id DESC");
    trace!("🗃️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<Order>().fetch_all(conn).await?;
    trace!("🗃️ Result of search_orders: {:?}", orders.len());
    Ok(orders)
}

pub async fn update_order_status(
    id: i64,
    status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("UPDATE orders SET order_status = $1, updated_at = $2 WHERE id = $3 RETURNING *")
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Debits one meal from the order, but only if it is still active with at least one meal left at the time of the
/// write. Reaching zero completes the order.
///
/// Returns the updated order, or `None` if nothing was debited.
pub async fn debit_meal(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            UPDATE orders SET
                meal_quantity = meal_quantity - 1,
                order_status = CASE WHEN meal_quantity - 1 = 0 THEN 'completed' ELSE order_status END,
                updated_at = $1
            WHERE id = $2 AND order_status = 'active' AND meal_quantity > 0
            RETURNING *;
        "#,
    )
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}
