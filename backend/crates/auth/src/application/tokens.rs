//! Bearer Token Codec
//!
//! Stateless HS256 JWT codec for the two credential kinds. Access and
//! refresh tokens carry *distinct* claim shapes with a `typ` tag that is
//! checked at verification, so one can never stand in for the other.
//!
//! Expiry is enforced against an injectable [`Clock`] rather than the
//! library's wall-clock check, which keeps token lifetimes deterministic
//! under test.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use platform::clock::Clock;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::value_object::public_id::PublicId;
use crate::error::{AuthError, AuthResult};

/// Token kind tag (`typ` claim)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Kind tag, always `"access"`
    pub typ: TokenKind,
    /// Subject: the user's public id (never the internal UUID)
    pub sub: PublicId,
    /// Display name snapshot
    pub name: String,
    /// Email snapshot
    pub email: String,
    /// Verification state snapshot
    pub email_verified: bool,
    /// Owning session id
    pub sid: Uuid,
    /// Issued-at (UTC Unix timestamp, seconds)
    pub iat: i64,
    /// Expiration (UTC Unix timestamp, seconds)
    pub exp: i64,
}

/// Claims carried by a refresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Kind tag, always `"refresh"`
    pub typ: TokenKind,
    /// Owning session id
    pub sid: Uuid,
    /// Issued-at (UTC Unix timestamp, seconds)
    pub iat: i64,
    /// Expiration (UTC Unix timestamp, seconds)
    pub exp: i64,
}

/// HS256 codec over the configured signing key
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Build a codec from the application config and a clock
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(&config.signing_key),
            decoding: DecodingKey::from_secret(&config.signing_key),
            access_ttl_secs: config.access_ttl_secs(),
            refresh_ttl_secs: config.refresh_ttl_secs(),
            clock,
        }
    }

    /// Issue an access token for the user bound to the session
    pub fn issue_access(&self, user: &User, session_id: Uuid) -> AuthResult<String> {
        let iat = self.clock.unix_now();
        let claims = AccessClaims {
            typ: TokenKind::Access,
            sub: user.public_id,
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            email_verified: user.email_verified,
            sid: session_id,
            iat,
            exp: iat + self.access_ttl_secs,
        };

        self.sign(&claims)
    }

    /// Issue a refresh token bound to the session
    pub fn issue_refresh(&self, session_id: Uuid) -> AuthResult<String> {
        let iat = self.clock.unix_now();
        let claims = RefreshClaims {
            typ: TokenKind::Refresh,
            sid: session_id,
            iat,
            exp: iat + self.refresh_ttl_secs,
        };

        self.sign(&claims)
    }

    /// Verify an access token: signature, claim shape, `typ` tag, expiry
    pub fn verify_access(&self, token: &str) -> AuthResult<AccessClaims> {
        let claims: AccessClaims = self.decode(token)?;
        if claims.typ != TokenKind::Access {
            return Err(AuthError::InvalidToken);
        }
        self.check_expiry(claims.exp)?;
        Ok(claims)
    }

    /// Verify a refresh token: signature, claim shape, `typ` tag, expiry
    ///
    /// The `typ` check is load-bearing: an access token deserializes as
    /// `RefreshClaims` (extra fields are ignored), so only the tag keeps
    /// the two kinds apart in that direction.
    pub fn verify_refresh(&self, token: &str) -> AuthResult<RefreshClaims> {
        let claims: RefreshClaims = self.decode(token)?;
        if claims.typ != TokenKind::Refresh {
            return Err(AuthError::InvalidToken);
        }
        self.check_expiry(claims.exp)?;
        Ok(claims)
    }

    fn sign<T: Serialize>(&self, claims: &T) -> AuthResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("Token signing failed: {}", e)))
    }

    fn decode<T: DeserializeOwned>(&self, token: &str) -> AuthResult<T> {
        // exp is still a required claim; only its wall-clock comparison is
        // disabled, because expiry runs against the injected clock below.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        decode::<T>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }

    fn check_expiry(&self, exp: i64) -> AuthResult<()> {
        if exp <= self.clock.unix_now() {
            return Err(AuthError::InvalidToken);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{display_name::DisplayName, email::Email};
    use platform::clock::ManualClock;

    fn test_user() -> User {
        User::new_from_oauth(
            DisplayName::new("Alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
            None,
        )
    }

    fn codec_at(now: i64) -> (TokenCodec, Arc<ManualClock>) {
        let config = AuthConfig::new(b"test-signing-key-for-codec".to_vec()).unwrap();
        let clock = Arc::new(ManualClock::new(now));
        (TokenCodec::new(&config, clock.clone()), clock)
    }

    #[test]
    fn test_access_round_trip_preserves_claims() {
        let (codec, _) = codec_at(1_700_000_000);
        let user = test_user();
        let sid = Uuid::new_v4();

        let token = codec.issue_access(&user, sid).unwrap();
        let claims = codec.verify_access(&token).unwrap();

        assert_eq!(claims.sub, user.public_id);
        assert_eq!(claims.name, "Alice");
        assert_eq!(claims.email, "alice@example.com");
        assert!(claims.email_verified);
        assert_eq!(claims.sid, sid);
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_000 + 15 * 60);
    }

    #[test]
    fn test_refresh_round_trip() {
        let (codec, _) = codec_at(1_700_000_000);
        let sid = Uuid::new_v4();

        let token = codec.issue_refresh(sid).unwrap();
        let claims = codec.verify_refresh(&token).unwrap();

        assert_eq!(claims.sid, sid);
        assert_eq!(claims.exp, 1_700_000_000 + 7 * 24 * 3600);
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let (codec, _) = codec_at(1_700_000_000);
        let sid = Uuid::new_v4();

        let refresh = codec.issue_refresh(sid).unwrap();
        assert!(matches!(
            codec.verify_access(&refresh),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_access_token_is_not_a_refresh_token() {
        let (codec, _) = codec_at(1_700_000_000);
        let user = test_user();
        let sid = Uuid::new_v4();

        // The access claims are a superset, so only the typ tag rejects this
        let access = codec.issue_access(&user, sid).unwrap();
        assert!(matches!(
            codec.verify_refresh(&access),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_access_token_fails() {
        let (codec, clock) = codec_at(1_700_000_000);
        let user = test_user();

        let token = codec.issue_access(&user, Uuid::new_v4()).unwrap();
        assert!(codec.verify_access(&token).is_ok());

        clock.advance(15 * 60);
        assert!(matches!(
            codec.verify_access(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_refresh_token_fails() {
        let (codec, clock) = codec_at(1_700_000_000);

        let token = codec.issue_refresh(Uuid::new_v4()).unwrap();
        clock.advance(7 * 24 * 3600 + 1);
        assert!(matches!(
            codec.verify_refresh(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_token_fails() {
        let (codec, _) = codec_at(1_700_000_000);
        assert!(codec.verify_access("not.a.token").is_err());
        assert!(codec.verify_refresh("").is_err());
    }

    #[test]
    fn test_wrong_key_fails() {
        let (codec_a, _) = codec_at(1_700_000_000);

        let config_b = AuthConfig::new(b"another-key-entirely".to_vec()).unwrap();
        let codec_b = TokenCodec::new(&config_b, Arc::new(ManualClock::new(1_700_000_000)));

        let token = codec_a.issue_refresh(Uuid::new_v4()).unwrap();
        assert!(codec_b.verify_refresh(&token).is_err());
    }
}
