/// Private-message handlers
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::db::{messages, users};
use crate::error::{AppError, Result};
use crate::handlers::users::find_user_or_404;
use crate::middleware::UserId;
use crate::models::{page_offset, Message, MessagePage, Page, PageQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 140))]
    pub body: String,
}

/// Send a private message to another user
#[utoipa::path(
    post,
    path = "/api/v1/users/{username}/messages",
    tag = "Messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = Message),
        (status = 404, description = "Unknown recipient")
    )
)]
pub async fn send_message(
    state: web::Data<AppState>,
    sender: UserId,
    username: web::Path<String>,
    payload: web::Json<SendMessageRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let recipient = find_user_or_404(&state, &username).await?;
    let message =
        messages::insert_message(&state.db, sender.0, recipient.id, payload.body.trim()).await?;

    Ok(HttpResponse::Created().json(message))
}

/// Received messages, newest first.
///
/// Opening the inbox moves the read marker, so everything listed here
/// counts as read from now on.
#[utoipa::path(
    get,
    path = "/api/v1/messages",
    tag = "Messages",
    params(PageQuery),
    responses((status = 200, description = "Messages", body = MessagePage))
)]
pub async fn list_messages(
    state: web::Data<AppState>,
    user_id: UserId,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    users::mark_messages_read(&state.db, user_id.0, Utc::now()).await?;

    let page = query.page();
    let per_page = super::per_page(&state);
    let total = messages::received_total(&state.db, user_id.0).await?;
    let items =
        messages::received_page(&state.db, user_id.0, per_page, page_offset(page, per_page))
            .await?;

    Ok(HttpResponse::Ok().json(Page::new(items, page, per_page, total)))
}

/// Number of messages received since the inbox was last opened
#[utoipa::path(
    get,
    path = "/api/v1/messages/unread",
    tag = "Messages",
    responses((status = 200, description = "Unread count"))
)]
pub async fn unread_count(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let user = users::find_by_id(&state.db, user_id.0)
        .await?
        .ok_or_else(|| AppError::NotFound("user".to_string()))?;

    let count = messages::unread_count(&state.db, user.id, user.last_message_read_time).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "count": count })))
}
