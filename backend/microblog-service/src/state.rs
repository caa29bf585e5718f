use crate::{
    config::Config,
    search::SearchClient,
    security::jwt::JwtKeys,
    services::{email::EmailService, translate::TranslatorClient},
};
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application context, built once in `main` and injected into
/// handlers via `web::Data`. All collaborators live here; there are no
/// process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub search: Option<Arc<SearchClient>>,
    pub mailer: EmailService,
    pub translator: TranslatorClient,
    pub jwt_keys: JwtKeys,
    pub config: Arc<Config>,
}

impl AppState {
    /// Search client, or the typed unavailable error when ES is not configured
    pub fn search(&self) -> crate::error::Result<&Arc<SearchClient>> {
        self.search
            .as_ref()
            .ok_or(crate::error::AppError::SearchUnavailable)
    }
}
