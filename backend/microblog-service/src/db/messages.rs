/// Private-message database operations
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Message;

/// Insert a message and return the stored row
pub async fn insert_message(
    pool: &PgPool,
    sender_id: Uuid,
    recipient_id: Uuid,
    body: &str,
) -> Result<Message> {
    let message = sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (id, sender_id, recipient_id, body, created_at)
        VALUES ($1, $2, $3, $4, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(sender_id)
    .bind(recipient_id)
    .bind(body)
    .fetch_one(pool)
    .await?;

    Ok(message)
}

/// Page of messages received by `user_id`, newest first
pub async fn received_page(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Message>> {
    let messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT * FROM messages
        WHERE recipient_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

/// Total number of messages received by `user_id`
pub async fn received_total(pool: &PgPool, user_id: Uuid) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE recipient_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Messages received after the read marker. A NULL marker means the user
/// has never opened their inbox, so everything is unread.
pub async fn unread_count(
    pool: &PgPool,
    user_id: Uuid,
    read_time: Option<DateTime<Utc>>,
) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM messages
        WHERE recipient_id = $1
          AND created_at > COALESCE($2, 'epoch'::timestamptz)
        "#,
    )
    .bind(user_id)
    .bind(read_time)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
