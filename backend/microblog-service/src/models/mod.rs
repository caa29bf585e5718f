pub mod message;
pub mod post;
pub mod user;

pub use message::Message;
pub use post::Post;
pub use user::{User, UserProfile, UserSummary};

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// One slice of a paginated listing.
///
/// Pages are 1-indexed. `has_next`/`has_prev` are derived from `total`
/// so that clients can build next/prev links without a second request.
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    PostPage = Page<Post>,
    MessagePage = Page<Message>,
    UserSummaryPage = Page<UserSummary>
)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: i64, per_page: i64, total: i64) -> Self {
        Self {
            items,
            page,
            per_page,
            total,
            has_next: page * per_page < total,
            has_prev: page > 1,
        }
    }
}

/// Query parameters accepted by every paginated endpoint
#[derive(Debug, Deserialize, IntoParams)]
pub struct PageQuery {
    /// 1-indexed page number, defaults to 1
    pub page: Option<i64>,
}

impl PageQuery {
    /// Clamped page number; page 0 and negative values collapse to 1
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Offset of the first row of `page` given `per_page` rows per page
pub fn page_offset(page: i64, per_page: i64) -> i64 {
    (page.max(1) - 1) * per_page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_flags() {
        let page = Page::new(vec![1, 2, 3], 1, 3, 7);
        assert!(page.has_next);
        assert!(!page.has_prev);

        let page = Page::new(vec![4, 5, 6], 2, 3, 7);
        assert!(page.has_next);
        assert!(page.has_prev);

        let page = Page::new(vec![7], 3, 3, 7);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn test_exact_boundary_has_no_next() {
        let page = Page::new(vec![1, 2, 3], 2, 3, 6);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn test_empty_listing() {
        let page: Page<i32> = Page::new(vec![], 1, 20, 0);
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn test_page_query_clamps() {
        assert_eq!(PageQuery { page: None }.page(), 1);
        assert_eq!(PageQuery { page: Some(0) }.page(), 1);
        assert_eq!(PageQuery { page: Some(-3) }.page(), 1);
        assert_eq!(PageQuery { page: Some(4) }.page(), 4);
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(2, 20), 20);
        assert_eq!(page_offset(5, 10), 40);
    }
}
