use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use microblog_service::{
    config::Config,
    handlers, metrics,
    middleware::JwtAuthMiddleware,
    openapi::ApiDoc,
    search::SearchClient,
    security::jwt::JwtKeys,
    services::{EmailService, TranslatorClient},
    state::AppState,
    workers::search_sync::{self, SearchSyncConfig},
};

async fn health_summary(state: web::Data<AppState>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "microblog-service",
            "version": env!("CARGO_PKG_VERSION"),
            "search_enabled": state.search.is_some(),
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "microblog-service",
        })),
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("starting microblog-service");

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let search = match &config.search.elasticsearch_url {
        Some(url) => {
            let client = SearchClient::new(url, &config.search.post_index)
                .await
                .context("Failed to initialize Elasticsearch client")?;
            info!(index = %config.search.post_index, "search enabled");
            Some(Arc::new(client))
        }
        None => {
            warn!("ELASTICSEARCH_URL not set; search endpoints will report unavailable");
            None
        }
    };

    let state = AppState {
        db: pool,
        search,
        mailer: EmailService::new(&config.email)
            .map_err(|e| anyhow::anyhow!("Failed to initialize mailer: {e}"))?,
        translator: TranslatorClient::new(&config.translator),
        jwt_keys: JwtKeys::from_secret(&config.auth.jwt_secret),
        config: Arc::new(config),
    };

    // Mirror committed writes into the search index in the background
    let _search_sync = state
        .search
        .clone()
        .map(|search| search_sync::spawn(state.db.clone(), search, SearchSyncConfig::default()));

    let bind_addr = (state.config.app.host.clone(), state.config.app.port);
    let cors_allowed_origins = state.config.app.cors_allowed_origins.clone();
    let state_data = web::Data::new(state);

    info!(host = %bind_addr.0, port = bind_addr.1, "binding HTTP server");

    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in cors_allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        let openapi_doc = ApiDoc::openapi();

        App::new()
            .app_data(state_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api/v1/openapi.json", openapi_doc),
            )
            .route("/metrics", web::get().to(metrics::serve_metrics))
            .route("/api/v1/health", web::get().to(health_summary))
            .route("/api/v1/health/live", web::get().to(liveness_check))
            .route(
                "/api/v1/auth/register",
                web::post().to(handlers::auth::register),
            )
            .route("/api/v1/auth/login", web::post().to(handlers::auth::login))
            .route(
                "/api/v1/auth/reset_password_request",
                web::post().to(handlers::auth::reset_password_request),
            )
            .route(
                "/api/v1/auth/reset_password",
                web::post().to(handlers::auth::reset_password),
            )
            .service(
                web::scope("/api/v1")
                    .wrap(JwtAuthMiddleware)
                    .route("/me", web::get().to(handlers::users::me))
                    .route("/me", web::put().to(handlers::users::update_me))
                    .route("/feed", web::get().to(handlers::feed::get_feed))
                    .route("/explore", web::get().to(handlers::posts::explore))
                    .route("/search", web::get().to(handlers::search::search_posts))
                    .route(
                        "/translate",
                        web::post().to(handlers::translate::translate_text),
                    )
                    .route("/posts", web::post().to(handlers::posts::create_post))
                    .route("/posts/{post_id}", web::get().to(handlers::posts::get_post))
                    .route(
                        "/messages",
                        web::get().to(handlers::messages::list_messages),
                    )
                    .route(
                        "/messages/unread",
                        web::get().to(handlers::messages::unread_count),
                    )
                    .route("/users/{username}", web::get().to(handlers::users::get_user))
                    .route(
                        "/users/{username}/posts",
                        web::get().to(handlers::users::user_posts),
                    )
                    .route(
                        "/users/{username}/followers",
                        web::get().to(handlers::users::followers),
                    )
                    .route(
                        "/users/{username}/following",
                        web::get().to(handlers::users::following),
                    )
                    .route(
                        "/users/{username}/follow",
                        web::post().to(handlers::follows::follow),
                    )
                    .route(
                        "/users/{username}/unfollow",
                        web::post().to(handlers::follows::unfollow),
                    )
                    .route(
                        "/users/{username}/messages",
                        web::post().to(handlers::messages::send_message),
                    ),
            )
    })
    .bind(bind_addr)
    .context("Failed to bind HTTP server")?
    .run();

    tokio::select! {
        result = server => {
            result.context("HTTP server terminated with error")?;
        }
        _ = shutdown_signal() => {
            info!("shutdown signal received, stopping");
        }
    }

    Ok(())
}
