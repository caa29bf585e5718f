/// Follow/unfollow handlers
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::handlers::users::find_user_or_404;
use crate::middleware::UserId;
use crate::services::FollowService;
use crate::state::AppState;

/// Follow a user
#[utoipa::path(
    post,
    path = "/api/v1/users/{username}/follow",
    tag = "Social",
    responses(
        (status = 200, description = "Following (idempotent)"),
        (status = 400, description = "Attempted to follow yourself"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn follow(
    state: web::Data<AppState>,
    actor: UserId,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let target = find_user_or_404(&state, &username).await?;

    FollowService::new(state.db.clone())
        .follow(actor.0, target.id)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("You are now following {}!", target.username)
    })))
}

/// Unfollow a user
#[utoipa::path(
    post,
    path = "/api/v1/users/{username}/unfollow",
    tag = "Social",
    responses(
        (status = 200, description = "Not following anymore (idempotent)"),
        (status = 400, description = "Attempted to unfollow yourself"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn unfollow(
    state: web::Data<AppState>,
    actor: UserId,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let target = find_user_or_404(&state, &username).await?;

    FollowService::new(state.db.clone())
        .unfollow(actor.0, target.id)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("You stopped following {}.", target.username)
    })))
}
