/// Post handlers
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::middleware::UserId;
use crate::models::{PageQuery, Post, PostPage};
use crate::services::{FeedService, PostService};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 140))]
    pub body: String,
}

/// Publish a new post
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tag = "Posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, description = "Invalid body")
    )
)]
pub async fn create_post(
    state: web::Data<AppState>,
    user_id: UserId,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let service = PostService::new(
        state.db.clone(),
        state
            .search
            .as_ref()
            .map(|s| s.post_index().to_string()),
    );
    let post = service.create_post(user_id.0, &payload.body).await?;

    Ok(HttpResponse::Created().json(post))
}

/// Fetch a single post
#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}",
    tag = "Posts",
    responses(
        (status = 200, description = "Post", body = Post),
        (status = 404, description = "Unknown post")
    )
)]
pub async fn get_post(
    state: web::Data<AppState>,
    _viewer: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new(state.db.clone(), None);
    let post = service.get_post(*post_id).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// All posts from all users, newest first
#[utoipa::path(
    get,
    path = "/api/v1/explore",
    tag = "Posts",
    params(PageQuery),
    responses((status = 200, description = "Posts", body = PostPage))
)]
pub async fn explore(
    state: web::Data<AppState>,
    _viewer: UserId,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = FeedService::new(state.db.clone())
        .explore(query.page(), super::per_page(&state))
        .await?;

    Ok(HttpResponse::Ok().json(page))
}
