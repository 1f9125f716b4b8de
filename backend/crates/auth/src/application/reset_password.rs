//! Password Reset Use Cases
//!
//! Request issues a single-use reset token (only its SHA-256 hash is
//! stored) and mails a reset link; confirm atomically consumes the token
//! and installs the new password hash.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::password_reset::PasswordResetToken;
use crate::domain::gateway::EmailSender;
use crate::domain::repository::{PasswordResetRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Result of requesting a password reset
///
/// The link and raw token are returned for non-email transports and dev
/// consoles; production boundaries ignore them.
#[derive(Debug)]
pub struct RequestPasswordResetOutput {
    pub reset_link: String,
    pub raw_token: String,
}

/// Use case: issue and mail a reset token
pub struct RequestPasswordResetUseCase<U, P, M>
where
    U: UserRepository,
    P: PasswordResetRepository,
    M: EmailSender,
{
    user_repo: Arc<U>,
    reset_repo: Arc<P>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<U, P, M> RequestPasswordResetUseCase<U, P, M>
where
    U: UserRepository,
    P: PasswordResetRepository,
    M: EmailSender,
{
    pub fn new(
        user_repo: Arc<U>,
        reset_repo: Arc<P>,
        mailer: Arc<M>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            reset_repo,
            mailer,
            config,
        }
    }

    /// Issue a reset token for the account with this email
    ///
    /// Unknown addresses get `UserNotFound`; this endpoint reports whether
    /// an account exists, unlike login.
    pub async fn execute(&self, email: &str) -> AuthResult<RequestPasswordResetOutput> {
        let email = Email::new(email)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let (token, raw) =
            PasswordResetToken::issue(user.user_id, self.config.reset_token_lifetime());
        self.reset_repo.replace_token(&token).await?;

        let link = self.config.reset_link(&raw);
        let body = format!(
            "<p>Click <a href=\"{link}\">here</a> to reset your password.</p>\
             <p>The link expires in one hour. If you did not request this, you can ignore this email.</p>"
        );

        // Delivery failure must not invalidate the token that was just
        // stored; the user can ask again.
        if let Err(e) = self.mailer.send(&user.email, "Password Reset", &body).await {
            tracing::warn!(public_id = %user.public_id, error = %e, "Reset email not delivered");
        }

        tracing::info!(public_id = %user.public_id, "Password reset token issued");

        Ok(RequestPasswordResetOutput {
            reset_link: link,
            raw_token: raw,
        })
    }
}

/// Use case: consume a reset token and install the new password
pub struct ConfirmPasswordResetUseCase<P>
where
    P: PasswordResetRepository,
{
    reset_repo: Arc<P>,
    config: Arc<AuthConfig>,
}

impl<P> ConfirmPasswordResetUseCase<P>
where
    P: PasswordResetRepository,
{
    pub fn new(reset_repo: Arc<P>, config: Arc<AuthConfig>) -> Self {
        Self { reset_repo, config }
    }

    /// Hash the raw token, consume its row, and update the password in one
    /// transaction
    ///
    /// Existing sessions stay alive; a reset changes the credential, not
    /// the session state.
    pub async fn execute(&self, raw_token: &str, new_password: String) -> AuthResult<()> {
        let raw = RawPassword::new(new_password)?;
        let password = UserPassword::from_raw(&raw, self.config.pepper())?;

        let token_hash = PasswordResetToken::hash_raw(raw_token);

        self.reset_repo
            .consume_token(&token_hash, &password)
            .await?
            .ok_or(AuthError::InvalidOrExpired)?;

        tracing::info!("Password reset completed");

        Ok(())
    }
}
