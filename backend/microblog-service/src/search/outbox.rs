/// Transactional outbox for search-index synchronization.
///
/// Write operations enqueue an entry in the same transaction as the
/// business write; the sync worker polls committed entries and mirrors
/// them into Elasticsearch. At-least-once delivery: an entry is marked
/// processed only after the index acknowledged it.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::Result;

pub const OP_INDEX: &str = "index";
pub const OP_DELETE: &str = "delete";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OutboxEntry {
    pub id: Uuid,
    pub index_name: String,
    pub document_id: Uuid,
    /// "index" or "delete"
    pub op: String,
    /// Document payload for index ops; NULL for deletes
    pub payload: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub retry_count: i32,
    pub last_error: Option<String>,
}

/// Enqueue an index operation within the caller's transaction
pub async fn enqueue_index(
    tx: &mut Transaction<'_, Postgres>,
    index_name: &str,
    document_id: Uuid,
    payload: serde_json::Value,
) -> Result<()> {
    enqueue(tx, index_name, document_id, OP_INDEX, Some(payload)).await
}

/// Enqueue a delete operation within the caller's transaction
pub async fn enqueue_delete(
    tx: &mut Transaction<'_, Postgres>,
    index_name: &str,
    document_id: Uuid,
) -> Result<()> {
    enqueue(tx, index_name, document_id, OP_DELETE, None).await
}

async fn enqueue(
    tx: &mut Transaction<'_, Postgres>,
    index_name: &str,
    document_id: Uuid,
    op: &str,
    payload: Option<serde_json::Value>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO search_outbox (id, index_name, document_id, op, payload, created_at, retry_count)
        VALUES ($1, $2, $3, $4, $5, NOW(), 0)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(index_name)
    .bind(document_id)
    .bind(op)
    .bind(payload)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Poll committed, unprocessed entries in creation order.
///
/// `FOR UPDATE SKIP LOCKED` lets multiple worker instances share the
/// queue without double-delivery inside one poll cycle.
pub async fn poll_unprocessed(
    pool: &PgPool,
    batch_size: i64,
    max_retries: i32,
) -> Result<Vec<OutboxEntry>> {
    let entries = sqlx::query_as::<_, OutboxEntry>(
        r#"
        SELECT * FROM search_outbox
        WHERE processed_at IS NULL
          AND retry_count < $2
        ORDER BY created_at ASC
        LIMIT $1
        FOR UPDATE SKIP LOCKED
        "#,
    )
    .bind(batch_size)
    .bind(max_retries)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Mark an entry as successfully mirrored into the index
pub async fn mark_processed(pool: &PgPool, entry_id: Uuid) -> Result<()> {
    sqlx::query("UPDATE search_outbox SET processed_at = NOW() WHERE id = $1")
        .bind(entry_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Record a delivery failure; the entry stays eligible until it exhausts
/// its retries
pub async fn mark_failed(pool: &PgPool, entry_id: Uuid, error: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE search_outbox
        SET retry_count = retry_count + 1, last_error = $2
        WHERE id = $1
        "#,
    )
    .bind(entry_id)
    .bind(error)
    .execute(pool)
    .await?;

    Ok(())
}
