//! OpenAPI documentation aggregation
use utoipa::OpenApi;

use crate::handlers;
use crate::models::{Message, MessagePage, Post, PostPage, UserProfile, UserSummary, UserSummaryPage};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Microblog Service API",
        description = "Social blogging service: accounts, posts, follow graph, feeds, private messages, full-text search and translation."
    ),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::reset_password_request,
        handlers::auth::reset_password,
        handlers::users::me,
        handlers::users::update_me,
        handlers::users::get_user,
        handlers::users::user_posts,
        handlers::users::followers,
        handlers::users::following,
        handlers::follows::follow,
        handlers::follows::unfollow,
        handlers::posts::create_post,
        handlers::posts::get_post,
        handlers::posts::explore,
        handlers::feed::get_feed,
        handlers::messages::send_message,
        handlers::messages::list_messages,
        handlers::messages::unread_count,
        handlers::search::search_posts,
        handlers::translate::translate_text,
    ),
    components(schemas(
        Post,
        Message,
        UserProfile,
        UserSummary,
        PostPage,
        MessagePage,
        UserSummaryPage,
        handlers::auth::RegisterRequest,
        handlers::auth::LoginRequest,
        handlers::auth::AuthResponse,
        handlers::auth::RequestPasswordResetRequest,
        handlers::auth::ResetPasswordRequest,
        handlers::users::UpdateProfileRequest,
        handlers::posts::CreatePostRequest,
        handlers::messages::SendMessageRequest,
        handlers::translate::TranslateRequest,
        handlers::translate::TranslateResponse,
    )),
    tags(
        (name = "Auth", description = "Registration, login and password reset"),
        (name = "Users", description = "Profiles and social listings"),
        (name = "Social", description = "Follow graph operations"),
        (name = "Posts", description = "Posting and browsing"),
        (name = "Feed", description = "The following feed"),
        (name = "Messages", description = "Private messages"),
        (name = "Search", description = "Full-text search"),
        (name = "Translate", description = "Machine translation"),
    )
)]
pub struct ApiDoc;
