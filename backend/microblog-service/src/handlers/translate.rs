/// Translation handler
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::Result;
use crate::middleware::UserId;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TranslateRequest {
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(length(min = 2, max = 5))]
    pub src_lang: String,
    #[validate(length(min = 2, max = 5))]
    pub dest_lang: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TranslateResponse {
    pub text: String,
}

/// Translate a text between two languages
#[utoipa::path(
    post,
    path = "/api/v1/translate",
    tag = "Translate",
    request_body = TranslateRequest,
    responses(
        (status = 200, description = "Translated text", body = TranslateResponse),
        (status = 502, description = "Translation service unavailable or failed")
    )
)]
pub async fn translate_text(
    state: web::Data<AppState>,
    _user_id: UserId,
    payload: web::Json<TranslateRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let text = state
        .translator
        .translate(&payload.text, &payload.src_lang, &payload.dest_lang)
        .await?;

    Ok(HttpResponse::Ok().json(TranslateResponse { text }))
}
