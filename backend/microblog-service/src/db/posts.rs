/// Post database operations
///
/// Every listing orders by `created_at DESC, id DESC` so that pagination
/// is deterministic across posts sharing a timestamp.
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::Result;
use crate::models::Post;

/// Insert a post inside the caller's transaction and return the stored row
pub async fn insert_post(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    body: &str,
    language: Option<&str>,
) -> Result<Post> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (id, user_id, body, language, created_at)
        VALUES ($1, $2, $3, $4, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(body)
    .bind(language)
    .fetch_one(&mut **tx)
    .await?;

    Ok(post)
}

/// Find post by ID
pub async fn find_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>> {
    let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_optional(pool)
        .await?;

    Ok(post)
}

/// Page of one author's posts, newest first
pub async fn user_posts_page(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT * FROM posts
        WHERE user_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Page of all posts from all users, newest first
pub async fn explore_page(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Post>> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT * FROM posts
        ORDER BY created_at DESC, id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Total number of posts
pub async fn explore_total(pool: &PgPool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Page of the following feed: posts authored by `user_id` or by anyone
/// `user_id` follows.
///
/// The visible-author set is pushed into the query as a set-membership
/// test, so no row can match twice and no GROUP BY de-duplication is
/// needed.
pub async fn feed_page(pool: &PgPool, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Post>> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT * FROM posts
        WHERE user_id = $1
           OR user_id IN (SELECT followed_id FROM follows WHERE follower_id = $1)
        ORDER BY created_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Total size of the following feed for `user_id`
pub async fn feed_total(pool: &PgPool, user_id: Uuid) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM posts
        WHERE user_id = $1
           OR user_id IN (SELECT followed_id FROM follows WHERE follower_id = $1)
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Fetch posts by ID, preserving the order of the `ids` slice.
///
/// Used by search: Elasticsearch decides relevance order, Postgres
/// supplies the rows.
pub async fn find_by_ids_ordered(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Post>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT * FROM posts
        WHERE id = ANY($1)
        ORDER BY array_position($1, id)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Batch of posts in insertion order, for index backfill
pub async fn batch(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Post>> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT * FROM posts
        ORDER BY created_at ASC, id ASC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}
