//! Outbound Gateway Traits
//!
//! Interfaces for external collaborators (mail transport, OAuth provider).
//! Implementations live in the infrastructure layer; tests use in-memory
//! fakes.

use crate::domain::value_object::{email::Email, oauth_provider::OauthProvider};
use crate::error::AuthResult;

/// Email sender trait
///
/// Delivery failure is surfaced as an error but the callers treat it as
/// non-fatal: the triggering operation's primary effect stands.
#[trait_variant::make(EmailSender: Send)]
pub trait LocalEmailSender {
    /// Send an HTML email
    async fn send(&self, to: &Email, subject: &str, html_body: &str) -> AuthResult<()>;
}

/// Values generated when starting an OAuth authorization
///
/// `state` and `code_verifier` must be held by the boundary (e.g. in
/// short-lived cookies) and presented back on the callback.
#[derive(Debug, Clone)]
pub struct OauthChallenge {
    /// Provider authorization URL to redirect the user to
    pub authorization_url: String,
    /// CSRF state echoed back by the provider
    pub state: String,
    /// PKCE code verifier matching the challenge embedded in the URL
    pub code_verifier: String,
}

/// Identity claims obtained from the provider after a successful exchange
#[derive(Debug, Clone)]
pub struct OauthClaims {
    /// Stable account id issued by the provider (`sub` for OpenID)
    pub provider_account_id: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// OAuth provider client trait
#[trait_variant::make(OauthClient: Send)]
pub trait LocalOauthClient {
    /// Which provider this client talks to
    fn provider(&self) -> OauthProvider;

    /// Generate state, PKCE verifier, and the authorization URL
    fn begin(&self) -> OauthChallenge;

    /// Exchange the callback code for an access token
    async fn exchange_code(&self, code: &str, code_verifier: &str) -> AuthResult<String>;

    /// Fetch identity claims with the provider access token
    async fn fetch_claims(&self, access_token: &str) -> AuthResult<OauthClaims>;
}
