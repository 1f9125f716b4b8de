//! SMTP Email Delivery
//!
//! [`SmtpMailer`] implements the [`EmailSender`] port over the `lettre`
//! async SMTP transport. Configuration comes from environment variables;
//! without `SMTP_HOST` set, [`SmtpConfig::from_env`] returns `None` and
//! the caller should wire a logging stand-in instead.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};

use crate::domain::gateway::EmailSender;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Default SMTP port (STARTTLS)
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set
const DEFAULT_FROM_ADDRESS: &str = "noreply@linky.local";

/// SMTP connection settings
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// RFC 5322 "From" address
    pub from_address: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl SmtpConfig {
    /// Load configuration from environment variables
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured.
    ///
    /// | Variable        | Required | Default               |
    /// |-----------------|----------|-----------------------|
    /// | `SMTP_HOST`     | yes      | —                     |
    /// | `SMTP_PORT`     | no       | `587`                 |
    /// | `SMTP_FROM`     | no       | `noreply@linky.local` |
    /// | `SMTP_USER`     | no       | —                     |
    /// | `SMTP_PASSWORD` | no       | —                     |
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            host,
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            user: std::env::var("SMTP_USER").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("from_address", &self.from_address)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Sends auth emails (verification, password reset) via SMTP
pub struct SmtpMailer {
    from_address: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build the STARTTLS transport from the given configuration
    pub fn new(config: SmtpConfig) -> AuthResult<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AuthError::MailDelivery(format!("SMTP transport: {e}")))?
            .port(config.port);

        if let (Some(user), Some(pass)) = (config.user, config.password) {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            from_address: config.from_address,
            transport: builder.build(),
        })
    }
}

impl EmailSender for SmtpMailer {
    async fn send(&self, to: &Email, subject: &str, html_body: &str) -> AuthResult<()> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| AuthError::MailDelivery(format!("From address: {e}")))?,
            )
            .to(to
                .as_str()
                .parse()
                .map_err(|e| AuthError::MailDelivery(format!("To address: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| AuthError::MailDelivery(format!("Message build: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AuthError::MailDelivery(format!("SMTP send: {e}")))?;

        tracing::info!(to = %to, subject, "Auth email sent");

        Ok(())
    }
}
