//! Logout Use Case
//!
//! Deletes the session row, which is the only revocation mechanism for
//! refresh tokens. The tokens themselves stay cryptographically valid
//! until they expire; refresh fails once the row is gone.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

/// Result of a logout
#[derive(Debug)]
pub struct LogoutOutput {
    /// `Set-Cookie` values that expire both auth cookies
    pub clear_cookies: [String; 2],
}

/// Logout use case
pub struct LogoutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> LogoutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Delete the session and expire the auth cookies
    ///
    /// Idempotent: logging out an already-deleted session succeeds, so a
    /// stale client can always converge to the logged-out state.
    pub async fn execute(&self, session_id: Uuid) -> AuthResult<LogoutOutput> {
        self.session_repo.delete(session_id).await?;

        tracing::info!(session_id = %session_id, "User logged out");

        Ok(LogoutOutput {
            clear_cookies: self.config.clear_auth_cookies(),
        })
    }
}
