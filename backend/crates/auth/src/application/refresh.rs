//! Session Refresh Use Case
//!
//! Exchanges a valid refresh token for a new token pair. The session id
//! never rotates; the same session row backs every pair issued for it,
//! so deleting that row revokes all of them at once.

use std::sync::Arc;

use crate::application::authenticate::AuthTokens;
use crate::application::config::AuthConfig;
use crate::application::tokens::TokenCodec;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Result of a successful refresh
#[derive(Debug)]
pub struct RefreshOutput {
    pub tokens: AuthTokens,
    /// `Set-Cookie` values carrying the new pair
    pub cookies: [String; 2],
}

/// Session refresh use case
pub struct RefreshUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
}

impl<U, S> RefreshUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        session_repo: Arc<S>,
        codec: Arc<TokenCodec>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            codec,
            config,
        }
    }

    /// Verify the refresh token, re-check the session, and issue a new pair
    ///
    /// The access claims are rebuilt from the current user row, so a name
    /// change or email verification shows up in the next access token
    /// without touching the session.
    pub async fn execute(&self, refresh_token: &str) -> AuthResult<RefreshOutput> {
        let claims = self
            .codec
            .verify_refresh(refresh_token)
            .map_err(|_| AuthError::InvalidSession)?;

        let session = self
            .session_repo
            .find_by_id(claims.sid)
            .await?
            .ok_or(AuthError::InvalidSession)?;
        if !session.valid {
            return Err(AuthError::InvalidSession);
        }

        let user = self
            .user_repo
            .find_by_id(&session.user_id)
            .await?
            .ok_or(AuthError::InvalidUser)?;

        let access_token = self.codec.issue_access(&user, session.session_id)?;
        let refresh_token = self.codec.issue_refresh(session.session_id)?;
        let cookies = self.config.auth_cookies(&access_token, &refresh_token);

        tracing::info!(
            public_id = %user.public_id,
            session_id = %session.session_id,
            "Session refreshed"
        );

        Ok(RefreshOutput {
            tokens: AuthTokens {
                access_token,
                refresh_token,
                session_id: session.session_id,
            },
            cookies,
        })
    }
}
