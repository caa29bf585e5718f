/// Authentication handlers: registration, login, password reset
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::users;
use crate::error::{AppError, Result};
use crate::security::{jwt, password};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(email, length(max = 120))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Issued on successful registration or login
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub access_token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RequestPasswordResetRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1))]
    pub token: String,
    pub password: String,
}

/// Register a new user account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username or email taken")
    )
)]
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    if users::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("username already taken".to_string()));
    }
    if users::find_by_email(&state.db, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("email already registered".to_string()));
    }

    let password_hash = password::hash_password(&payload.password)?;
    let user = users::create_user(&state.db, &payload.username, &payload.email, &password_hash)
        .await?;

    info!(user_id = %user.id, username = %user.username, "registered new user");

    let access_token = jwt::generate_access_token(&state.jwt_keys, user.id, &user.username)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        user_id: user.id,
        username: user.username,
        email: user.email,
        access_token,
    }))
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let user = users::find_by_username(&state.db, &payload.username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    password::verify_password(&payload.password, &user.password_hash)?;

    let access_token = jwt::generate_access_token(&state.jwt_keys, user.id, &user.username)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        user_id: user.id,
        username: user.username,
        email: user.email,
        access_token,
    }))
}

/// Request a password-reset email.
///
/// Always answers 202 so the endpoint cannot be used to probe which
/// addresses have accounts.
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset_password_request",
    tag = "Auth",
    request_body = RequestPasswordResetRequest,
    responses(
        (status = 202, description = "Reset email sent if the account exists")
    )
)]
pub async fn reset_password_request(
    state: web::Data<AppState>,
    payload: web::Json<RequestPasswordResetRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    if let Some(user) = users::find_by_email(&state.db, &payload.email).await? {
        let token = jwt::generate_reset_token(&state.jwt_keys, user.id, &user.username)?;
        if let Err(e) = state
            .mailer
            .send_password_reset_email(&user.email, &token)
            .await
        {
            warn!(user_id = %user.id, error = %e, "failed to send password reset email");
        }
    }

    Ok(HttpResponse::Accepted().json(serde_json::json!({
        "message": "Check your email for the instructions to reset your password"
    })))
}

/// Reset the password using an emailed token
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset_password",
    tag = "Auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset"),
        (status = 401, description = "Invalid or expired token")
    )
)]
pub async fn reset_password(
    state: web::Data<AppState>,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let user_id = jwt::validate_reset_token(&state.jwt_keys, &payload.token)?;
    let user = users::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user".to_string()))?;

    let password_hash = password::hash_password(&payload.password)?;
    users::set_password_hash(&state.db, user.id, &password_hash).await?;

    info!(user_id = %user.id, "password reset completed");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Your password has been reset"
    })))
}
