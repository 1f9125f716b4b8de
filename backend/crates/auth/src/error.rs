//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
///
/// Raw passwords, reset tokens, verification codes, and signing keys must
/// never be placed in these messages.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Input failed domain validation (name, email, password policy)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Email address is already registered
    #[error("An account with this email already exists")]
    AlreadyExists,

    /// Invalid credentials
    ///
    /// Deliberately identical for unknown email, passwordless (OAuth-only)
    /// account, and wrong password, so login cannot be used to enumerate
    /// accounts.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Caller is not allowed to perform this operation
    #[error("Unauthorized")]
    Unauthorized,

    /// Bearer token failed verification (signature, shape, tag, or expiry)
    #[error("Invalid token")]
    InvalidToken,

    /// Session is missing, invalidated, or its refresh token failed to verify
    #[error("Invalid session")]
    InvalidSession,

    /// Session points at a user that no longer exists
    #[error("Invalid user")]
    InvalidUser,

    /// OAuth callback parameters were missing, mismatched, or rejected upstream
    #[error("Invalid OAuth attempt")]
    InvalidOauthAttempt,

    /// Ephemeral token (verification code / reset token) is missing or expired
    ///
    /// Never distinguishes the two cases.
    #[error("Invalid or expired token")]
    InvalidOrExpired,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Outbound mail could not be handed to the transport
    #[error("Mail delivery failed: {0}")]
    MailDelivery(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) | AuthError::InvalidOrExpired => ErrorKind::BadRequest,
            AuthError::AlreadyExists => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::Unauthorized
            | AuthError::InvalidToken
            | AuthError::InvalidSession
            | AuthError::InvalidUser
            | AuthError::InvalidOauthAttempt => ErrorKind::Unauthorized,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::MailDelivery(_) => ErrorKind::ServiceUnavailable,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError for the boundary layer, logging on the way out
    pub fn into_app_error(self) -> AppError {
        self.log();
        match self {
            AuthError::Database(e) => {
                AppError::new(ErrorKind::InternalServerError, "Database error").with_source(e)
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::MailDelivery(msg) => {
                tracing::error!(message = %msg, "Mail delivery failure");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidOauthAttempt => {
                tracing::warn!("OAuth attempt rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_string()),
            _ => AuthError::Internal(err.message().to_string()),
        }
    }
}

impl From<platform::password::PasswordPolicyError> for AuthError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<crate::domain::value_object::display_name::DisplayNameError> for AuthError {
    fn from(err: crate::domain::value_object::display_name::DisplayNameError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
