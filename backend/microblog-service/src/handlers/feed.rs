/// Following-feed handler
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::middleware::UserId;
use crate::models::{PageQuery, PostPage};
use crate::services::FeedService;
use crate::state::AppState;

/// Posts by the current user and everyone they follow, newest first
#[utoipa::path(
    get,
    path = "/api/v1/feed",
    tag = "Feed",
    params(PageQuery),
    responses((status = 200, description = "Feed page", body = PostPage))
)]
pub async fn get_feed(
    state: web::Data<AppState>,
    user_id: UserId,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = FeedService::new(state.db.clone())
        .feed(user_id.0, query.page(), super::per_page(&state))
        .await?;

    Ok(HttpResponse::Ok().json(page))
}
