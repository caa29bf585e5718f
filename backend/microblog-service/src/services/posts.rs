/// Post creation.
///
/// A new post and its search-outbox entry are written in one transaction;
/// the background sync worker mirrors committed entries into the index.
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::posts;
use crate::error::{AppError, Result};
use crate::models::Post;
use crate::search::{self, outbox};

#[derive(Clone)]
pub struct PostService {
    pool: PgPool,
    /// Index name for outbox entries; None disables search sync entirely
    post_index: Option<String>,
}

impl PostService {
    pub fn new(pool: PgPool, post_index: Option<String>) -> Self {
        Self { pool, post_index }
    }

    /// Create a post for `author_id`, detecting its language and enqueuing
    /// the index operation transactionally.
    pub async fn create_post(&self, author_id: Uuid, body: &str) -> Result<Post> {
        let body = body.trim();
        if body.is_empty() || body.chars().count() > 140 {
            return Err(AppError::Validation(
                "Post body must be between 1 and 140 characters".to_string(),
            ));
        }

        let language = detect_language(body);

        let mut tx = self.pool.begin().await?;
        let post = posts::insert_post(&mut tx, author_id, body, language.as_deref()).await?;
        if let Some(index) = &self.post_index {
            outbox::enqueue_index(&mut tx, index, post.id, search::post_document(&post)).await?;
        }
        tx.commit().await?;

        Ok(post)
    }

    /// Fetch one post
    pub async fn get_post(&self, post_id: Uuid) -> Result<Post> {
        posts::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))
    }
}

/// Detected language code for a post body, or None when detection is not
/// confident enough to store. Mirrors the create-time-only contract: the
/// tag is computed once and never revised.
fn detect_language(body: &str) -> Option<String> {
    whatlang::detect(body)
        .filter(|info| info.is_reliable())
        .map(|info| info.lang().code().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_english() {
        let lang = detect_language(
            "The quick brown fox jumps over the lazy dog while the sun sets behind the hills",
        );
        assert_eq!(lang.as_deref(), Some("eng"));
    }

    #[test]
    fn test_nontextual_body_yields_none() {
        // No letters, no signal
        assert_eq!(detect_language("1234 5678 90"), None);
    }
}
