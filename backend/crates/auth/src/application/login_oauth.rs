//! OAuth Login Use Case
//!
//! Validates the provider callback, exchanges the code, resolves the
//! claims to a local account (three-case decision), and establishes a
//! session exactly like the password login.

use std::sync::Arc;

use crate::application::authenticate::Authenticator;
use crate::application::config::AuthConfig;
use crate::application::login::LoginOutput;
use crate::domain::entity::oauth_account::OauthAccount;
use crate::domain::entity::session::ClientMeta;
use crate::domain::entity::user::User;
use crate::domain::gateway::{OauthChallenge, OauthClaims, OauthClient};
use crate::domain::repository::{OauthAccountRepository, SessionRepository, UserWithProviderLink};
use crate::domain::value_object::{display_name::DisplayName, email::Email};
use crate::error::{AuthError, AuthResult};

/// Parameters received on the OAuth callback
///
/// `stored_state` and `stored_verifier` come from the short-lived cookies
/// written when the authorization began.
#[derive(Debug, Default)]
pub struct OauthCallbackInput {
    pub code: Option<String>,
    pub state: Option<String>,
    pub stored_state: Option<String>,
    pub stored_verifier: Option<String>,
}

/// How OAuth claims map onto local accounts
///
/// Precedence is exactly: already linked > same email > new account.
#[derive(Debug)]
pub enum OauthDecision {
    /// A user with that email is already linked to the provider
    LinkedExisting(User),
    /// A user with that email exists but has no link for the provider
    LinkNewProvider(User),
    /// No user with that email; create user + link atomically
    CreateNew(User),
}

/// Map a lookup result and provider claims to a decision
///
/// Pure so the precedence rules are testable without a datastore. The
/// `CreateNew` user starts verified (the provider vouched for the email)
/// and without a password.
pub fn resolve_decision(
    lookup: Option<UserWithProviderLink>,
    claims: &OauthClaims,
) -> AuthResult<OauthDecision> {
    match lookup {
        Some(UserWithProviderLink {
            user,
            link: Some(_),
        }) => Ok(OauthDecision::LinkedExisting(user)),
        Some(UserWithProviderLink { user, link: None }) => {
            Ok(OauthDecision::LinkNewProvider(user))
        }
        None => {
            // Upstream claims we cannot accept are a failed attempt, not a
            // validation problem of our caller's making.
            let name =
                DisplayName::new(&claims.name).map_err(|_| AuthError::InvalidOauthAttempt)?;
            let email = Email::new(&claims.email).map_err(|_| AuthError::InvalidOauthAttempt)?;
            Ok(OauthDecision::CreateNew(User::new_from_oauth(
                name,
                email,
                claims.avatar_url.clone(),
            )))
        }
    }
}

/// OAuth login use case
pub struct LoginOauthUseCase<O, C, S>
where
    O: OauthAccountRepository,
    C: OauthClient,
    S: SessionRepository,
{
    oauth_repo: Arc<O>,
    oauth_client: Arc<C>,
    authenticator: Arc<Authenticator<S>>,
    config: Arc<AuthConfig>,
}

impl<O, C, S> LoginOauthUseCase<O, C, S>
where
    O: OauthAccountRepository,
    C: OauthClient,
    S: SessionRepository,
{
    pub fn new(
        oauth_repo: Arc<O>,
        oauth_client: Arc<C>,
        authenticator: Arc<Authenticator<S>>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            oauth_repo,
            oauth_client,
            authenticator,
            config,
        }
    }

    /// Start an authorization: the boundary redirects to the returned URL
    /// and stores `state` / `code_verifier` for the callback
    pub fn begin(&self) -> OauthChallenge {
        self.oauth_client.begin()
    }

    pub async fn execute(
        &self,
        input: OauthCallbackInput,
        client: ClientMeta,
    ) -> AuthResult<LoginOutput> {
        let code = required(input.code)?;
        let state = required(input.state)?;
        let stored_state = required(input.stored_state)?;
        let verifier = required(input.stored_verifier)?;

        if !platform::crypto::constant_time_eq(state.as_bytes(), stored_state.as_bytes()) {
            tracing::warn!("OAuth state mismatch");
            return Err(AuthError::InvalidOauthAttempt);
        }

        let provider_token = self
            .oauth_client
            .exchange_code(&code, &verifier)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "OAuth code exchange failed");
                AuthError::InvalidOauthAttempt
            })?;

        let claims = self
            .oauth_client
            .fetch_claims(&provider_token)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "OAuth claims fetch failed");
                AuthError::InvalidOauthAttempt
            })?;

        let user = self.resolve(&claims).await?;

        let tokens = self.authenticator.establish(&user, client).await?;
        let cookies = self
            .config
            .auth_cookies(&tokens.access_token, &tokens.refresh_token);

        tracing::info!(
            public_id = %user.public_id,
            session_id = %tokens.session_id,
            provider = %self.oauth_client.provider(),
            "User logged in via OAuth"
        );

        Ok(LoginOutput {
            user,
            tokens,
            cookies,
        })
    }

    /// Apply the three-case decision against the datastore
    async fn resolve(&self, claims: &OauthClaims) -> AuthResult<User> {
        let provider = self.oauth_client.provider();
        let email = Email::new(&claims.email).map_err(|_| AuthError::InvalidOauthAttempt)?;
        let lookup = self
            .oauth_repo
            .find_user_with_link(&provider, &email)
            .await?;

        match resolve_decision(lookup, claims)? {
            OauthDecision::LinkedExisting(user) => Ok(user),
            OauthDecision::LinkNewProvider(mut user) => {
                let link = OauthAccount::new(
                    user.user_id,
                    provider,
                    claims.provider_account_id.clone(),
                );
                // A unique violation here means a concurrent link attempt;
                // it surfaces as a database error, never as a user conflict.
                self.oauth_repo
                    .link_account(&link, claims.avatar_url.as_deref())
                    .await?;

                // Mirror the SQL avatar backfill on the in-memory copy
                if user.avatar_url.is_none() {
                    user.avatar_url = claims.avatar_url.clone();
                }
                Ok(user)
            }
            OauthDecision::CreateNew(user) => {
                let link = OauthAccount::new(
                    user.user_id,
                    provider,
                    claims.provider_account_id.clone(),
                );
                self.oauth_repo.create_user_with_link(&user, &link).await?;

                tracing::info!(public_id = %user.public_id, "User created from OAuth claims");
                Ok(user)
            }
        }
    }
}

fn required(value: Option<String>) -> AuthResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::InvalidOauthAttempt)
}
