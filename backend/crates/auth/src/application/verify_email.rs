//! Email Verification Use Cases
//!
//! Request issues a fresh 6-digit code (superseding any previous one for
//! the user) and mails a verification link; confirm consumes the code and
//! flips the user's `email_verified` flag.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::email_verification::EmailVerificationCode;
use crate::domain::gateway::EmailSender;
use crate::domain::repository::{EmailVerificationRepository, UserRepository};
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::{AuthError, AuthResult};

/// Result of requesting a verification code
///
/// The link and code are returned so transports other than email (or a
/// dev console) can surface them; production boundaries ignore them.
#[derive(Debug)]
pub struct RequestEmailVerificationOutput {
    pub verification_link: String,
    pub code: String,
}

/// Use case: issue and mail a verification code
pub struct RequestEmailVerificationUseCase<U, E, M>
where
    U: UserRepository,
    E: EmailVerificationRepository,
    M: EmailSender,
{
    user_repo: Arc<U>,
    verification_repo: Arc<E>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<U, E, M> RequestEmailVerificationUseCase<U, E, M>
where
    U: UserRepository,
    E: EmailVerificationRepository,
    M: EmailSender,
{
    pub fn new(
        user_repo: Arc<U>,
        verification_repo: Arc<E>,
        mailer: Arc<M>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            verification_repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<RequestEmailVerificationOutput> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.email_verified {
            return Err(AuthError::Unauthorized);
        }

        let code =
            EmailVerificationCode::issue(user.user_id, self.config.verification_code_lifetime());
        self.verification_repo.replace_code(&code).await?;

        let link = self.config.verification_link(&user.email, &code.code);
        let body = format!(
            "<p>Click <a href=\"{link}\">here</a> to verify your email address.</p>\
             <p>Or enter this code: <strong>{}</strong></p>\
             <p>The code expires in 24 hours. If you did not request this, you can ignore this email.</p>",
            code.code
        );

        // Delivery failure must not invalidate the code that was just
        // stored; the user can ask for a resend.
        if let Err(e) = self.mailer.send(&user.email, "Email Verification", &body).await {
            tracing::warn!(public_id = %user.public_id, error = %e, "Verification email not delivered");
        }

        tracing::info!(public_id = %user.public_id, "Verification code issued");

        Ok(RequestEmailVerificationOutput {
            verification_link: link,
            code: code.code,
        })
    }
}

/// Use case: consume a verification code and mark the email verified
pub struct ConfirmEmailVerificationUseCase<U, E>
where
    U: UserRepository,
    E: EmailVerificationRepository,
{
    user_repo: Arc<U>,
    verification_repo: Arc<E>,
}

impl<U, E> ConfirmEmailVerificationUseCase<U, E>
where
    U: UserRepository,
    E: EmailVerificationRepository,
{
    pub fn new(user_repo: Arc<U>, verification_repo: Arc<E>) -> Self {
        Self {
            user_repo,
            verification_repo,
        }
    }

    /// Consume the code for `email` and verify the user
    ///
    /// Wrong email, wrong code, and expired code are indistinguishable to
    /// the caller.
    pub async fn execute(&self, email: &str, code: &str) -> AuthResult<()> {
        let email = Email::new(email).map_err(|_| AuthError::InvalidOrExpired)?;

        let user_id = self
            .verification_repo
            .consume_code(&email, code)
            .await?
            .ok_or(AuthError::InvalidOrExpired)?;

        self.user_repo.mark_email_verified(&user_id).await?;

        tracing::info!("Email address verified");

        Ok(())
    }
}
