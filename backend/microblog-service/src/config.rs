/// Configuration management for the microblog service
///
/// Loads configuration from environment variables.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// SMTP configuration
    pub email: EmailConfig,
    /// Search index configuration
    pub search: SearchConfig,
    /// Machine-translation configuration
    pub translator: TranslatorConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// Page size for every paginated listing
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: i64,
    /// Comma-separated CORS origins, `*` allows any
    pub cors_allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Min connections in pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret for access and password-reset tokens
    pub jwt_secret: String,
}

/// SMTP configuration. An empty host puts the mailer in no-op mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub use_starttls: bool,
    /// From address for outgoing mail
    pub smtp_from: String,
    /// Base URL embedded in password-reset links
    pub password_reset_base_url: String,
}

/// Search index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Elasticsearch URL; when unset, search endpoints report unavailable
    pub elasticsearch_url: Option<String>,
    /// Index that holds post documents
    #[serde(default = "default_post_index")]
    pub post_index: String,
}

/// Machine-translation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Subscription key; when unset, translation requests fail with a typed error
    pub key: Option<String>,
    /// Translator API endpoint
    #[serde(default = "default_translator_endpoint")]
    pub endpoint: String,
}

// Default values
fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_posts_per_page() -> i64 {
    20
}

fn default_post_index() -> String {
    "posts".to_string()
}

fn default_translator_endpoint() -> String {
    "https://api.cognitive.microsofttranslator.com".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            posts_per_page: std::env::var("POSTS_PER_PAGE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_posts_per_page),
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        };

        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL")
                .context("DATABASE_URL environment variable not set")?,
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_max_connections),
            min_connections: std::env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_min_connections),
        };

        let auth = AuthConfig {
            jwt_secret: std::env::var("JWT_SECRET")
                .context("JWT_SECRET environment variable not set")?,
        };

        let email = EmailConfig {
            smtp_host: std::env::var("SMTP_HOST").unwrap_or_default(),
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(25),
            smtp_username: std::env::var("SMTP_USERNAME").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
            use_starttls: std::env::var("SMTP_USE_STARTTLS")
                .map(|s| matches!(s.to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false),
            smtp_from: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| "no-reply@microblog.dev".to_string()),
            password_reset_base_url: std::env::var("PASSWORD_RESET_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080/reset_password".to_string()),
        };

        let search = SearchConfig {
            elasticsearch_url: std::env::var("ELASTICSEARCH_URL")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            post_index: std::env::var("SEARCH_POST_INDEX")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(default_post_index),
        };

        let translator = TranslatorConfig {
            key: std::env::var("TRANSLATOR_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            endpoint: std::env::var("TRANSLATOR_ENDPOINT")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(default_translator_endpoint),
        };

        Ok(Config {
            app,
            database,
            auth,
            email,
            search,
            translator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        std::env::set_var("DATABASE_URL", "postgres://test");
        std::env::set_var("JWT_SECRET", "test-secret");

        let config = Config::from_env().unwrap();

        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.host, "0.0.0.0");
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.app.posts_per_page, 20);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.min_connections, 5);
        assert_eq!(config.search.post_index, "posts");
        assert!(config.search.elasticsearch_url.is_none());
        assert!(config.translator.key.is_none());
        assert!(config.email.smtp_host.is_empty());
    }
}
