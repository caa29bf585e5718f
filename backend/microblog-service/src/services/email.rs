/// Email delivery over SMTP
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::EmailConfig;
use crate::error::{AppError, Result};

/// Async email transport wrapper (SMTP or no-op)
#[derive(Clone)]
pub struct EmailService {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
    password_reset_base_url: String,
}

impl EmailService {
    /// Build email service from configuration
    ///
    /// If the SMTP host is empty, operates in no-op mode (logs only), so
    /// development and tests need no mail infrastructure.
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let from = config
            .smtp_from
            .parse::<Mailbox>()
            .map_err(|e| AppError::Internal(format!("Invalid SMTP_FROM address: {e}")))?;

        let transport = if config.smtp_host.trim().is_empty() {
            warn!("SMTP host not configured; email service will operate in no-op mode");
            None
        } else {
            let builder = if config.use_starttls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            }
            .map_err(|e| AppError::Internal(format!("Failed to configure SMTP transport: {e}")))?
            .port(config.smtp_port);

            let builder = if let (Some(username), Some(password)) =
                (&config.smtp_username, &config.smtp_password)
            {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            } else {
                builder
            };

            Some(Arc::new(builder.build()))
        };

        Ok(Self {
            transport,
            from,
            password_reset_base_url: config.password_reset_base_url.clone(),
        })
    }

    /// Check if SMTP transport is enabled
    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Send a password reset email carrying a short-lived reset token
    pub async fn send_password_reset_email(&self, recipient: &str, token: &str) -> Result<()> {
        let link = format!(
            "{}/{}",
            self.password_reset_base_url.trim_end_matches('/'),
            token
        );
        let body = format!(
            "We received your password reset request.\n\n\
            To reset your password, visit the following link:\n{link}\n\n\
            The link expires in 10 minutes.\n\
            If you did not request a password reset, simply ignore this message."
        );

        self.send_mail(recipient, "[Microblog] Reset Your Password", &body)
            .await
    }

    async fn send_mail(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        let Some(transport) = &self.transport else {
            info!(recipient, subject, "email transport disabled; skipping send");
            return Ok(());
        };

        let to = recipient
            .parse::<Mailbox>()
            .map_err(|e| AppError::Email(format!("Invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| AppError::Email(format!("Failed to build message: {e}")))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Email(format!("SMTP send failed: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_config() -> EmailConfig {
        EmailConfig {
            smtp_host: String::new(),
            smtp_port: 25,
            smtp_username: None,
            smtp_password: None,
            use_starttls: false,
            smtp_from: "no-reply@microblog.dev".to_string(),
            password_reset_base_url: "http://localhost:8080/reset_password/".to_string(),
        }
    }

    #[tokio::test]
    async fn test_noop_mode_send_succeeds() {
        let mailer = EmailService::new(&noop_config()).unwrap();
        assert!(!mailer.is_enabled());
        assert!(mailer
            .send_password_reset_email("susan@example.com", "token123")
            .await
            .is_ok());
    }

    #[test]
    fn test_invalid_from_address_rejected() {
        let mut config = noop_config();
        config.smtp_from = "not an address".to_string();
        assert!(EmailService::new(&config).is_err());
    }
}
