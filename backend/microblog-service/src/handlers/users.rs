/// User profile handlers
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::users;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{Page, PageQuery, PostPage, User, UserProfile, UserSummary, UserSummaryPage};
use crate::services::{FeedService, FollowService};
use crate::state::AppState;

/// Resolve a username or fail with 404
pub(crate) async fn find_user_or_404(state: &AppState, username: &str) -> Result<User> {
    users::find_by_username(&state.db, username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {username}")))
}

/// Assemble the profile view: live counts plus, for other people's
/// profiles, whether the viewer follows them.
pub(crate) async fn build_profile(
    state: &AppState,
    user: &User,
    viewer: Option<Uuid>,
) -> Result<UserProfile> {
    let follows = FollowService::new(state.db.clone());

    let is_following = match viewer {
        Some(viewer_id) if viewer_id != user.id => {
            Some(follows.is_following(viewer_id, user.id).await?)
        }
        _ => None,
    };

    Ok(UserProfile {
        id: user.id,
        username: user.username.clone(),
        about_me: user.about_me.clone(),
        avatar_url: user.avatar_url(128),
        last_seen: user.last_seen,
        follower_count: follows.follower_count(user.id).await?,
        following_count: follows.following_count(user.id).await?,
        post_count: users::post_count(&state.db, user.id).await?,
        is_following,
    })
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: Option<String>,
    #[validate(length(max = 140))]
    pub about_me: Option<String>,
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/v1/me",
    tag = "Users",
    responses((status = 200, description = "Own profile", body = UserProfile))
)]
pub async fn me(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let user = users::find_by_id(&state.db, user_id.0)
        .await?
        .ok_or_else(|| AppError::NotFound("user".to_string()))?;

    let profile = build_profile(&state, &user, None).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Edit the current user's profile
#[utoipa::path(
    put,
    path = "/api/v1/me",
    tag = "Users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 409, description = "Username taken")
    )
)]
pub async fn update_me(
    state: web::Data<AppState>,
    user_id: UserId,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let user = users::find_by_id(&state.db, user_id.0)
        .await?
        .ok_or_else(|| AppError::NotFound("user".to_string()))?;

    let username = payload.username.as_deref().unwrap_or(&user.username);
    if username != user.username
        && users::find_by_username(&state.db, username).await?.is_some()
    {
        return Err(AppError::Conflict("username already taken".to_string()));
    }

    let about_me = payload
        .about_me
        .as_deref()
        .or(user.about_me.as_deref());

    let updated = users::update_profile(&state.db, user.id, username, about_me).await?;
    let profile = build_profile(&state, &updated, None).await?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Another user's profile
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}",
    tag = "Users",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn get_user(
    state: web::Data<AppState>,
    viewer: UserId,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let user = find_user_or_404(&state, &username).await?;
    let profile = build_profile(&state, &user, Some(viewer.0)).await?;

    Ok(HttpResponse::Ok().json(profile))
}

/// One user's posts, newest first
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}/posts",
    tag = "Users",
    params(PageQuery),
    responses((status = 200, description = "Posts", body = PostPage))
)]
pub async fn user_posts(
    state: web::Data<AppState>,
    _viewer: UserId,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let user = find_user_or_404(&state, &username).await?;
    let page = FeedService::new(state.db.clone())
        .user_posts(user.id, query.page(), super::per_page(&state))
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// Users who follow this user
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}/followers",
    tag = "Users",
    params(PageQuery),
    responses((status = 200, description = "Followers", body = UserSummaryPage))
)]
pub async fn followers(
    state: web::Data<AppState>,
    _viewer: UserId,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let user = find_user_or_404(&state, &username).await?;
    let follows = FollowService::new(state.db.clone());

    let page = query.page();
    let per_page = super::per_page(&state);
    let total = follows.follower_count(user.id).await?;
    let items = follows
        .followers_page(user.id, per_page, crate::models::page_offset(page, per_page))
        .await?;

    let summaries: Vec<UserSummary> = items.iter().map(UserSummary::from).collect();
    Ok(HttpResponse::Ok().json(Page::new(summaries, page, per_page, total)))
}

/// Users this user is following
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}/following",
    tag = "Users",
    params(PageQuery),
    responses((status = 200, description = "Following", body = UserSummaryPage))
)]
pub async fn following(
    state: web::Data<AppState>,
    _viewer: UserId,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let user = find_user_or_404(&state, &username).await?;
    let follows = FollowService::new(state.db.clone());

    let page = query.page();
    let per_page = super::per_page(&state);
    let total = follows.following_count(user.id).await?;
    let items = follows
        .following_page(user.id, per_page, crate::models::page_offset(page, per_page))
        .await?;

    let summaries: Vec<UserSummary> = items.iter().map(UserSummary::from).collect();
    Ok(HttpResponse::Ok().json(Page::new(summaries, page, per_page, total)))
}
