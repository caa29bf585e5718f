/// Feed composition: reverse-chronological, de-duplicated unions of posts.
///
/// Every listing is a live view over committed state. Ordering is
/// `created_at DESC, id DESC` everywhere so that equal timestamps
/// paginate deterministically.
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::posts;
use crate::error::Result;
use crate::models::{page_offset, Page, Post};

#[derive(Clone)]
pub struct FeedService {
    pool: PgPool,
}

impl FeedService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Posts authored by `user_id` or by anyone `user_id` follows
    pub async fn feed(&self, user_id: Uuid, page: i64, per_page: i64) -> Result<Page<Post>> {
        let page = page.max(1);
        let total = posts::feed_total(&self.pool, user_id).await?;
        let items =
            posts::feed_page(&self.pool, user_id, per_page, page_offset(page, per_page)).await?;

        Ok(Page::new(items, page, per_page, total))
    }

    /// All posts from all users
    pub async fn explore(&self, page: i64, per_page: i64) -> Result<Page<Post>> {
        let page = page.max(1);
        let total = posts::explore_total(&self.pool).await?;
        let items = posts::explore_page(&self.pool, per_page, page_offset(page, per_page)).await?;

        Ok(Page::new(items, page, per_page, total))
    }

    /// One author's timeline
    pub async fn user_posts(&self, user_id: Uuid, page: i64, per_page: i64) -> Result<Page<Post>> {
        let page = page.max(1);
        let total = crate::db::users::post_count(&self.pool, user_id).await?;
        let items =
            posts::user_posts_page(&self.pool, user_id, per_page, page_offset(page, per_page))
                .await?;

        Ok(Page::new(items, page, per_page, total))
    }
}
