/// Follow-edge database operations
///
/// The edge set is a single table keyed by (follower_id, followed_id),
/// indexed in both directions. Counts are always computed live; there are
/// no cached counters to drift.
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::User;

/// Insert the edge if absent; returns true if a new row was inserted.
///
/// A racing duplicate insert lands on the ON CONFLICT arm and reports
/// success with `false` — never an error.
pub async fn add_edge(pool: &PgPool, follower_id: Uuid, followed_id: Uuid) -> Result<bool> {
    let inserted = sqlx::query_as::<_, (Uuid,)>(
        r#"
        INSERT INTO follows (follower_id, followed_id, created_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (follower_id, followed_id) DO NOTHING
        RETURNING follower_id
        "#,
    )
    .bind(follower_id)
    .bind(followed_id)
    .fetch_optional(pool)
    .await?;

    Ok(inserted.is_some())
}

/// Remove the edge if present; returns true if a row was removed
pub async fn remove_edge(pool: &PgPool, follower_id: Uuid, followed_id: Uuid) -> Result<bool> {
    let affected = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE follower_id = $1 AND followed_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(followed_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

/// Membership query over the edge set
pub async fn exists(pool: &PgPool, follower_id: Uuid, followed_id: Uuid) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM follows
            WHERE follower_id = $1 AND followed_id = $2
        )
        "#,
    )
    .bind(follower_id)
    .bind(followed_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Number of users following `user_id`, computed live
pub async fn follower_count(pool: &PgPool, user_id: Uuid) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE followed_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Number of users `user_id` is following, computed live
pub async fn following_count(pool: &PgPool, user_id: Uuid) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Page of users who follow `user_id`, most recent follower first
pub async fn followers_page(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT u.* FROM users u
        JOIN follows f ON f.follower_id = u.id
        WHERE f.followed_id = $1
        ORDER BY f.created_at DESC, u.id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Page of users `user_id` is following, most recently followed first
pub async fn following_page(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT u.* FROM users u
        JOIN follows f ON f.followed_id = u.id
        WHERE f.follower_id = $1
        ORDER BY f.created_at DESC, u.id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(users)
}
