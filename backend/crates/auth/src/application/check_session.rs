//! Check Session Use Case
//!
//! Verifies an access token and exposes its claims. The fast path is
//! pure signature + expiry verification; `execute_checked` additionally
//! consults the session store so a deleted session is caught before the
//! access token expires on its own.

use std::sync::Arc;

use crate::application::tokens::{AccessClaims, TokenCodec};
use crate::domain::repository::SessionRepository;
use crate::error::{AuthError, AuthResult};

/// Check session use case
pub struct CheckSessionUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    codec: Arc<TokenCodec>,
}

impl<S> CheckSessionUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, codec: Arc<TokenCodec>) -> Self {
        Self {
            session_repo,
            codec,
        }
    }

    /// Verify the access token and return its claims
    ///
    /// No datastore round trip: within its 15-minute lifetime an access
    /// token is trusted on signature alone.
    pub fn execute(&self, access_token: &str) -> AuthResult<AccessClaims> {
        self.codec.verify_access(access_token)
    }

    /// Verify the token and require its session to still exist
    ///
    /// For sensitive operations that must observe a logout immediately.
    pub async fn execute_checked(&self, access_token: &str) -> AuthResult<AccessClaims> {
        let claims = self.codec.verify_access(access_token)?;

        let session = self
            .session_repo
            .find_by_id(claims.sid)
            .await?
            .ok_or(AuthError::InvalidSession)?;
        if !session.valid {
            return Err(AuthError::InvalidSession);
        }

        Ok(claims)
    }

    /// Just check whether the access token verifies (returns bool)
    pub fn is_valid(&self, access_token: &str) -> bool {
        self.codec.verify_access(access_token).is_ok()
    }
}
