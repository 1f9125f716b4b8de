//! Google OAuth Client
//!
//! Implements the [`OauthClient`] port against Google's OAuth 2.0 / OIDC
//! endpoints using the authorization-code flow with PKCE (S256).

use reqwest::Client;
use serde::Deserialize;

use platform::crypto::{random_bytes, sha256, to_base64_url};

use crate::domain::gateway::{OauthChallenge, OauthClaims, OauthClient};
use crate::domain::value_object::oauth_provider::OauthProvider;
use crate::error::{AuthError, AuthResult};

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Google OAuth application credentials
#[derive(Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Callback URL registered with Google
    pub redirect_uri: String,
}

impl GoogleConfig {
    /// Load configuration from environment variables
    ///
    /// Returns `None` unless `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`,
    /// and `GOOGLE_REDIRECT_URI` are all set.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            client_id: std::env::var("GOOGLE_CLIENT_ID").ok()?,
            client_secret: std::env::var("GOOGLE_CLIENT_SECRET").ok()?,
            redirect_uri: std::env::var("GOOGLE_REDIRECT_URI").ok()?,
        })
    }
}

impl std::fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// Google implementation of the OAuth port
pub struct GoogleOauthClient {
    config: GoogleConfig,
    http: Client,
}

impl GoogleOauthClient {
    pub fn new(config: GoogleConfig) -> Self {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, http }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserInfo {
    sub: String,
    name: Option<String>,
    email: Option<String>,
    picture: Option<String>,
}

impl OauthClient for GoogleOauthClient {
    fn provider(&self) -> OauthProvider {
        OauthProvider::google()
    }

    fn begin(&self) -> OauthChallenge {
        let state = to_base64_url(&random_bytes(32));
        let code_verifier = to_base64_url(&random_bytes(32));
        let code_challenge = to_base64_url(&sha256(code_verifier.as_bytes()));

        // state and challenge are base64url, already URL-safe
        let authorization_url = format!(
            "{AUTHORIZATION_ENDPOINT}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&code_challenge={}&code_challenge_method=S256",
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode("openid email profile"),
            state,
            code_challenge,
        );

        OauthChallenge {
            authorization_url,
            state,
            code_verifier,
        }
    }

    async fn exchange_code(&self, code: &str, code_verifier: &str) -> AuthResult<String> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
            ("code_verifier", code_verifier),
        ];

        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Internal(format!("Google token exchange: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            // The error body carries an OAuth error code, never a credential
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(AuthError::Internal(format!(
                "Google token exchange failed: HTTP {status}: {error_text}"
            )));
        }

        let token = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::Internal(format!("Google token response: {e}")))?;

        Ok(token.access_token)
    }

    async fn fetch_claims(&self, access_token: &str) -> AuthResult<OauthClaims> {
        let response = self
            .http
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Internal(format!("Google userinfo: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Internal(format!(
                "Google userinfo failed: HTTP {status}"
            )));
        }

        let info = response
            .json::<UserInfo>()
            .await
            .map_err(|e| AuthError::Internal(format!("Google userinfo response: {e}")))?;

        let email = info
            .email
            .ok_or_else(|| AuthError::Internal("Google userinfo missing email".to_string()))?;

        // Accounts without a profile name fall back to the mailbox name
        let name = info.name.unwrap_or_else(|| {
            email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string()
        });

        Ok(OauthClaims {
            provider_account_id: info.sub,
            email,
            name,
            avatar_url: info.picture,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GoogleOauthClient {
        GoogleOauthClient::new(GoogleConfig {
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:3000/auth/google/callback".to_string(),
        })
    }

    #[test]
    fn test_begin_builds_pkce_challenge() {
        let challenge = test_client().begin();

        assert!(challenge
            .authorization_url
            .starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(challenge.authorization_url.contains("client_id=client-123"));
        assert!(challenge
            .authorization_url
            .contains("code_challenge_method=S256"));
        assert!(challenge
            .authorization_url
            .contains(&format!("state={}", challenge.state)));

        // Challenge in the URL must be the S256 digest of the verifier
        let expected = to_base64_url(&sha256(challenge.code_verifier.as_bytes()));
        assert!(challenge
            .authorization_url
            .contains(&format!("code_challenge={expected}")));
        assert_ne!(challenge.state, challenge.code_verifier);
    }

    #[test]
    fn test_begin_is_unpredictable() {
        let client = test_client();
        let a = client.begin();
        let b = client.begin();

        assert_ne!(a.state, b.state);
        assert_ne!(a.code_verifier, b.code_verifier);
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let config = GoogleConfig {
            client_id: "client-123".to_string(),
            client_secret: "hunter2".to_string(),
            redirect_uri: "http://localhost:3000/auth/google/callback".to_string(),
        };

        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
