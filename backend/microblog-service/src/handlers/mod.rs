pub mod auth;
pub mod feed;
pub mod follows;
pub mod messages;
pub mod posts;
pub mod search;
pub mod translate;
pub mod users;

use crate::state::AppState;

/// Effective page size: configured value, hard-capped at 100
pub(crate) fn per_page(state: &AppState) -> i64 {
    state.config.app.posts_per_page.clamp(1, 100)
}
