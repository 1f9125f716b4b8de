//! Login Use Case
//!
//! Authenticates email + password and establishes a session.

use std::sync::Arc;

use crate::application::authenticate::{AuthTokens, Authenticator};
use crate::application::config::AuthConfig;
use crate::domain::entity::session::ClientMeta;
use crate::domain::entity::user::User;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub tokens: AuthTokens,
    /// Ready-made Set-Cookie values for both credentials
    pub cookies: [String; 2],
}

/// Login use case
pub struct LoginUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    authenticator: Arc<Authenticator<S>>,
    config: Arc<AuthConfig>,
}

impl<U, S> LoginUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        authenticator: Arc<Authenticator<S>>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            authenticator,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput, client: ClientMeta) -> AuthResult<LoginOutput> {
        // Malformed input, unknown email, passwordless (OAuth-only) account,
        // and wrong password must be indistinguishable to the caller.
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password_hash = user
            .password_hash
            .as_ref()
            .ok_or(AuthError::InvalidCredentials)?;

        if !password_hash.verify(&raw_password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.authenticator.establish(&user, client).await?;
        let cookies = self
            .config
            .auth_cookies(&tokens.access_token, &tokens.refresh_token);

        tracing::info!(
            public_id = %user.public_id,
            session_id = %tokens.session_id,
            "User logged in"
        );

        Ok(LoginOutput {
            user,
            tokens,
            cookies,
        })
    }
}
