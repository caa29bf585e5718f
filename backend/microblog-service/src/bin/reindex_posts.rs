/// Bulk sync posts from PostgreSQL into Elasticsearch
///
/// Used for initial index population and recovery after index loss or
/// outbox entries that exhausted their retries.
///
/// Usage:
///   DATABASE_URL=postgres://... ELASTICSEARCH_URL=http://... cargo run --bin reindex-posts
///
/// Environment variables:
///   - DATABASE_URL: PostgreSQL connection string
///   - ELASTICSEARCH_URL: Elasticsearch connection string
///   - SEARCH_POST_INDEX: target index name (default: posts)
///   - SYNC_BATCH_SIZE: posts to index per batch (default: 100)
///   - SYNC_DELAY_MS: delay between batches in milliseconds (default: 100)
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use microblog_service::db::posts;
use microblog_service::search::{self, SearchClient};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let database_url =
        env::var("DATABASE_URL").context("DATABASE_URL environment variable not set")?;
    let elasticsearch_url =
        env::var("ELASTICSEARCH_URL").context("ELASTICSEARCH_URL environment variable not set")?;
    let index = env::var("SEARCH_POST_INDEX").unwrap_or_else(|_| "posts".to_string());
    let batch_size: i64 = env::var("SYNC_BATCH_SIZE")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(100);
    let delay = Duration::from_millis(
        env::var("SYNC_DELAY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100),
    );

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    let client = SearchClient::new(&elasticsearch_url, &index)
        .await
        .context("Failed to initialize Elasticsearch client")?;

    info!(index = %index, batch_size, "starting post reindex");

    let mut offset = 0;
    let mut total = 0usize;

    loop {
        let batch = posts::batch(&pool, batch_size, offset).await?;
        if batch.is_empty() {
            break;
        }

        for post in &batch {
            client
                .index_document(&index, post.id, &search::post_document(post))
                .await
                .with_context(|| format!("Failed to index post {}", post.id))?;
        }

        total += batch.len();
        offset += batch_size;
        info!(total, "indexed batch");

        tokio::time::sleep(delay).await;
    }

    info!(total, "reindex complete");

    Ok(())
}
