//! Application Configuration
//!
//! Configuration for the Auth application layer. A config cannot be
//! constructed without a signing key; everything else has defaults.

use std::time::Duration;

use kernel::error::app_error::{AppError, AppResult};
use platform::cookie::CookieConfig;

use crate::domain::value_object::email::Email;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing key for bearer tokens (required, non-empty)
    pub signing_key: Vec<u8>,
    /// Access token TTL (15 minutes)
    pub access_token_ttl: Duration,
    /// Refresh token TTL (7 days)
    pub refresh_token_ttl: Duration,
    /// Email verification code TTL (24 hours)
    pub verification_code_ttl: Duration,
    /// Password reset token TTL (1 hour)
    pub reset_token_ttl: Duration,
    /// Access token cookie name
    pub access_cookie_name: String,
    /// Refresh token cookie name
    pub refresh_cookie_name: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Base URL of the frontend, used to compose verification/reset links
    pub frontend_base_url: String,
}

impl AuthConfig {
    /// Create a config with the given signing key and default settings
    pub fn new(signing_key: Vec<u8>) -> AppResult<Self> {
        if signing_key.is_empty() {
            return Err(AppError::internal("Signing key must not be empty")
                .with_action("Provide a non-empty AUTH_SIGNING_KEY"));
        }
        Ok(Self::with_key(signing_key))
    }

    /// Create config with a random signing key (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self::with_key(secret.to_vec())
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Read configuration from the environment
    ///
    /// Variables:
    /// - `AUTH_SIGNING_KEY` (required, base64)
    /// - `FRONTEND_BASE_URL` (default `http://localhost:3000`)
    /// - `AUTH_PASSWORD_PEPPER` (optional, base64)
    /// - `AUTH_COOKIE_SECURE` (optional, `false`/`0` to disable)
    pub fn from_env() -> AppResult<Self> {
        let encoded = std::env::var("AUTH_SIGNING_KEY").map_err(|_| {
            AppError::internal("AUTH_SIGNING_KEY is required")
                .with_action("Provide a base64-encoded signing key")
        })?;
        let signing_key = platform::crypto::from_base64(&encoded)
            .map_err(|_| AppError::internal("AUTH_SIGNING_KEY is not valid base64"))?;

        let mut config = Self::new(signing_key)?;

        if let Ok(url) = std::env::var("FRONTEND_BASE_URL") {
            config.frontend_base_url = url;
        }
        if let Ok(encoded) = std::env::var("AUTH_PASSWORD_PEPPER") {
            let pepper = platform::crypto::from_base64(&encoded)
                .map_err(|_| AppError::internal("AUTH_PASSWORD_PEPPER is not valid base64"))?;
            config.password_pepper = Some(pepper);
        }
        if let Ok(secure) = std::env::var("AUTH_COOKIE_SECURE") {
            config.cookie_secure = secure != "false" && secure != "0";
        }

        Ok(config)
    }

    fn with_key(signing_key: Vec<u8>) -> Self {
        Self {
            signing_key,
            access_token_ttl: Duration::from_secs(15 * 60),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600),
            verification_code_ttl: Duration::from_secs(24 * 3600),
            reset_token_ttl: Duration::from_secs(3600),
            access_cookie_name: "access_token".to_string(),
            refresh_cookie_name: "refresh_token".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            frontend_base_url: "http://localhost:3000".to_string(),
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Access token TTL in whole seconds
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_token_ttl.as_secs() as i64
    }

    /// Refresh token TTL in whole seconds
    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_token_ttl.as_secs() as i64
    }

    /// Verification code lifetime as a chrono duration
    pub fn verification_code_lifetime(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.verification_code_ttl.as_secs() as i64)
    }

    /// Reset token lifetime as a chrono duration
    pub fn reset_token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.reset_token_ttl.as_secs() as i64)
    }

    // ========================================================================
    // Credential transport
    // ========================================================================

    /// Cookie settings for the access token
    pub fn access_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.access_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.access_ttl_secs()),
        }
    }

    /// Cookie settings for the refresh token
    pub fn refresh_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.refresh_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.refresh_ttl_secs()),
        }
    }

    /// Ready-made Set-Cookie values for both credentials
    pub fn auth_cookies(&self, access_token: &str, refresh_token: &str) -> [String; 2] {
        [
            self.access_cookie().build_set_cookie(access_token),
            self.refresh_cookie().build_set_cookie(refresh_token),
        ]
    }

    /// Set-Cookie values that clear both credentials
    pub fn clear_auth_cookies(&self) -> [String; 2] {
        [
            self.access_cookie().build_delete_cookie(),
            self.refresh_cookie().build_delete_cookie(),
        ]
    }

    // ========================================================================
    // Link composition
    // ========================================================================

    /// Email verification link sent to the user
    pub fn verification_link(&self, email: &Email, code: &str) -> String {
        format!(
            "{}/verify-email?token={}&email={}",
            self.frontend_base_url.trim_end_matches('/'),
            code,
            urlencoding::encode(email.as_str()),
        )
    }

    /// Password reset link sent to the user
    pub fn reset_link(&self, raw_token: &str) -> String {
        format!(
            "{}/reset-password/{}",
            self.frontend_base_url.trim_end_matches('/'),
            raw_token,
        )
    }
}
