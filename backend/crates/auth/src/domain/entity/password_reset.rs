//! Password Reset Token Entity
//!
//! Ephemeral single-use reset token. Only the SHA-256 hash is stored; the
//! raw token is returned exactly once at issuance and never touches storage
//! or logs.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::user_id::UserId;

/// Raw reset token length in random bytes (hex-encoded to 64 chars)
const RESET_TOKEN_BYTES: usize = 32;

/// Password reset token (stored form)
#[derive(Clone)]
pub struct PasswordResetToken {
    /// Owning user
    pub user_id: UserId,
    /// SHA-256 hex of the raw token
    pub token_hash: String,
    /// Expiry; rows past this are inert at read time
    pub expires_at: DateTime<Utc>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// Issue a fresh token for the user
    ///
    /// Returns the entity (hash only) together with the raw token to embed
    /// in the reset link. The raw value cannot be recovered afterwards.
    pub fn issue(user_id: UserId, ttl: Duration) -> (Self, String) {
        let raw = platform::crypto::random_hex(RESET_TOKEN_BYTES);
        let token_hash = Self::hash_raw(&raw);
        let now = Utc::now();

        let token = Self {
            user_id,
            token_hash,
            expires_at: now + ttl,
            created_at: now,
        };

        (token, raw)
    }

    /// Derive the stored hash from a raw token presented by a client
    pub fn hash_raw(raw: &str) -> String {
        platform::crypto::sha256_hex(raw.as_bytes())
    }

    /// Whether the token is past its expiry at the given instant
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl fmt::Debug for PasswordResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordResetToken")
            .field("user_id", &self.user_id)
            .field("token_hash", &"[HASH]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
