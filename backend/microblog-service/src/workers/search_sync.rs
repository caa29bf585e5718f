/// Background worker that drains the search outbox into Elasticsearch.
///
/// Poll loop with bounded retries per entry. Postgres stays the source of
/// truth; a sync failure never affects business state. Entries that
/// exhaust their retries are left in the table with `last_error` set for
/// inspection and manual replay (see the reindex-posts binary).
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::metrics;
use crate::search::{outbox, SearchClient};

#[derive(Debug, Clone)]
pub struct SearchSyncConfig {
    pub poll_interval: Duration,
    pub batch_size: i64,
    pub max_retries: i32,
}

impl Default for SearchSyncConfig {
    fn default() -> Self {
        let poll_interval = std::env::var("SEARCH_SYNC_POLL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(1500));

        let batch_size = std::env::var("SEARCH_SYNC_BATCH_SIZE")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(50);

        let max_retries = std::env::var("SEARCH_SYNC_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse::<i32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(5);

        Self {
            poll_interval,
            batch_size,
            max_retries,
        }
    }
}

/// Spawn the sync loop. Runs until the process shuts down.
pub fn spawn(pool: PgPool, search: Arc<SearchClient>, config: SearchSyncConfig) -> JoinHandle<()> {
    info!(
        poll_ms = config.poll_interval.as_millis() as u64,
        batch_size = config.batch_size,
        max_retries = config.max_retries,
        "starting search sync worker"
    );

    tokio::spawn(async move {
        loop {
            match process_batch(&pool, &search, &config).await {
                Ok(0) => {}
                Ok(n) => debug!(processed = n, "search sync batch complete"),
                Err(e) => error!(error = %e, "search sync batch failed"),
            }
            sleep(config.poll_interval).await;
        }
    })
}

/// Drain one batch; returns the number of entries handled
async fn process_batch(
    pool: &PgPool,
    search: &SearchClient,
    config: &SearchSyncConfig,
) -> crate::error::Result<usize> {
    let entries = outbox::poll_unprocessed(pool, config.batch_size, config.max_retries).await?;
    let count = entries.len();

    for entry in entries {
        let outcome = match entry.op.as_str() {
            outbox::OP_INDEX => match &entry.payload {
                Some(payload) => search
                    .index_document(&entry.index_name, entry.document_id, payload)
                    .await
                    .map_err(|e| e.to_string()),
                None => Err("index entry without payload".to_string()),
            },
            outbox::OP_DELETE => search
                .delete_document(&entry.index_name, entry.document_id)
                .await
                .map_err(|e| e.to_string()),
            other => Err(format!("unknown outbox op: {other}")),
        };

        match outcome {
            Ok(()) => {
                outbox::mark_processed(pool, entry.id).await?;
                metrics::SEARCH_SYNC_PUBLISHED.inc();
            }
            Err(e) => {
                warn!(
                    entry_id = %entry.id,
                    document_id = %entry.document_id,
                    retry_count = entry.retry_count,
                    error = %e,
                    "failed to sync outbox entry"
                );
                outbox::mark_failed(pool, entry.id, &e).await?;
                metrics::SEARCH_SYNC_FAILURES.inc();
            }
        }
    }

    Ok(count)
}
