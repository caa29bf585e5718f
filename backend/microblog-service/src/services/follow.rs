/// Social graph operations over the follow-edge set.
///
/// The self-follow invariant lives here, not in the schema and not in the
/// handlers: every caller goes through this service, so no route can
/// forget the check.
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::follows;
use crate::error::{AppError, Result};
use crate::models::User;

#[derive(Clone)]
pub struct FollowService {
    pool: PgPool,
}

impl FollowService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Make `actor` follow `target`.
    ///
    /// Idempotent: following an already-followed user succeeds silently.
    /// Returns true if a new edge was created.
    pub async fn follow(&self, actor: Uuid, target: Uuid) -> Result<bool> {
        if actor == target {
            return Err(AppError::SelfFollow);
        }
        follows::add_edge(&self.pool, actor, target).await
    }

    /// Make `actor` unfollow `target`.
    ///
    /// Idempotent: unfollowing a user who was never followed succeeds
    /// silently. Returns true if an edge was removed.
    pub async fn unfollow(&self, actor: Uuid, target: Uuid) -> Result<bool> {
        if actor == target {
            return Err(AppError::SelfFollow);
        }
        follows::remove_edge(&self.pool, actor, target).await
    }

    /// Membership query over the edge set
    pub async fn is_following(&self, actor: Uuid, target: Uuid) -> Result<bool> {
        follows::exists(&self.pool, actor, target).await
    }

    /// Live count of users following `user_id`
    pub async fn follower_count(&self, user_id: Uuid) -> Result<i64> {
        follows::follower_count(&self.pool, user_id).await
    }

    /// Live count of users `user_id` is following
    pub async fn following_count(&self, user_id: Uuid) -> Result<i64> {
        follows::following_count(&self.pool, user_id).await
    }

    pub async fn followers_page(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>> {
        follows::followers_page(&self.pool, user_id, limit, offset).await
    }

    pub async fn following_page(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>> {
        follows::following_page(&self.pool, user_id, limit, offset).await
    }
}
