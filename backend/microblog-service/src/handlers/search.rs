/// Full-text search handler.
///
/// Elasticsearch decides which posts match and in what order; Postgres
/// supplies the rows, re-ordered to match the relevance ranking.
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::db::posts;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{Page, PostPage};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Search expression
    pub q: String,
    /// 1-indexed page number, defaults to 1
    pub page: Option<i64>,
}

/// Search post bodies
#[utoipa::path(
    get,
    path = "/api/v1/search",
    tag = "Search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching posts", body = PostPage),
        (status = 503, description = "Search not configured")
    )
)]
pub async fn search_posts(
    state: web::Data<AppState>,
    _viewer: UserId,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let expression = query.q.trim();
    if expression.is_empty() {
        return Err(AppError::Validation(
            "search query must not be empty".to_string(),
        ));
    }

    let search = state.search()?;
    let page = query.page.unwrap_or(1).max(1);
    let per_page = super::per_page(&state);

    let (ids, total) = search.search_posts(expression, page, per_page).await?;
    let items = posts::find_by_ids_ordered(&state.db, &ids).await?;

    Ok(HttpResponse::Ok().json(Page::new(items, page, per_page, total)))
}
