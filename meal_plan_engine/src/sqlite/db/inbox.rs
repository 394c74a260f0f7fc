use chrono::Utc;
use sqlx::SqliteConnection;

use crate::db_types::{InboundMessage, NewInboundMessage};

/// Appends the message to the inbound log. Returns `None` without writing anything if a message with the same
/// provider id was already logged.
pub async fn insert_message(
    message: NewInboundMessage,
    conn: &mut SqliteConnection,
) -> Result<Option<InboundMessage>, sqlx::Error> {
    let message = sqlx::query_as(
        r#"
            INSERT INTO inbound_messages (message_id, sender, message, received_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (message_id) DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(message.message_id)
    .bind(message.sender)
    .bind(message.message)
    .bind(message.received_at)
    .bind(Utc::now())
    .fetch_optional(conn)
    .await?;
    Ok(message)
}

pub async fn fetch_messages(limit: i64, conn: &mut SqliteConnection) -> Result<Vec<InboundMessage>, sqlx::Error> {
    let messages = sqlx::query_as("SELECT * FROM inbound_messages ORDER BY received_at DESC, id DESC LIMIT $1")
        .bind(limit)
        .fetch_all(conn)
        .await?;
    Ok(messages)
}
