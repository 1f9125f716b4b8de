//! Session Establishment
//!
//! Shared tail of every successful sign-in (password or OAuth): create the
//! session row, then issue the access/refresh pair bound to it.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::tokens::TokenCodec;
use crate::domain::entity::session::{ClientMeta, Session};
use crate::domain::entity::user::User;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

/// The issued credential pair plus the session they are bound to
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub session_id: Uuid,
}

/// Creates sessions and issues their tokens
pub struct Authenticator<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    codec: Arc<TokenCodec>,
}

impl<S> Authenticator<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, codec: Arc<TokenCodec>) -> Self {
        Self {
            session_repo,
            codec,
        }
    }

    /// Create a session for the user and issue both tokens
    pub async fn establish(&self, user: &User, client: ClientMeta) -> AuthResult<AuthTokens> {
        let session = Session::new(user.user_id, client);
        self.session_repo.create(&session).await?;

        let access_token = self.codec.issue_access(user, session.session_id)?;
        let refresh_token = self.codec.issue_refresh(session.session_id)?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            session_id: session.session_id,
        })
    }
}
