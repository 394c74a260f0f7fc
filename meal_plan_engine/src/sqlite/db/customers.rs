use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{Customer, NewCustomer};

/// Inserts the customer unless the number is already registered, returning `false` in the second field if the
/// customer already existed.
///
/// The insert relies on the unique constraint on `whatsapp_number`, so two racing inserts for the same number still
/// produce a single row.
pub async fn idempotent_insert(
    customer: NewCustomer,
    conn: &mut SqliteConnection,
) -> Result<(Customer, bool), sqlx::Error> {
    let now = Utc::now();
    let inserted: Option<Customer> = sqlx::query_as(
        r#"
            INSERT INTO customers (whatsapp_number, delivery_address, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (whatsapp_number) DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(&customer.whatsapp_number)
    .bind(&customer.delivery_address)
    .bind(now)
    .fetch_optional(&mut *conn)
    .await?;
    if let Some(customer) = inserted {
        debug!("🗃️ Customer #{} inserted for {}", customer.id, customer.whatsapp_number);
        return Ok((customer, true));
    }
    let existing = fetch_customer_by_number(&customer.whatsapp_number, conn).await?.ok_or(sqlx::Error::RowNotFound)?;
    Ok((existing, false))
}

pub async fn fetch_customer(id: i64, conn: &mut SqliteConnection) -> Result<Option<Customer>, sqlx::Error> {
    let customer = sqlx::query_as("SELECT * FROM customers WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(customer)
}

pub async fn fetch_customer_by_number(
    whatsapp_number: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Customer>, sqlx::Error> {
    let customer = sqlx::query_as("SELECT * FROM customers WHERE whatsapp_number = $1")
        .bind(whatsapp_number)
        .fetch_optional(conn)
        .await?;
    Ok(customer)
}

pub async fn customer_count(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM customers").fetch_one(conn).await?;
    Ok(count)
}
