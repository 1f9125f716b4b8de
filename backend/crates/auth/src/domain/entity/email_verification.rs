//! Email Verification Code Entity
//!
//! Ephemeral single-use code mailed to the user. At most one live code per
//! user; issuing a new one replaces the old. The code is a secret and is
//! redacted from Debug output.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::domain::value_object::user_id::UserId;

/// Email verification code
#[derive(Clone)]
pub struct EmailVerificationCode {
    /// Owning user
    pub user_id: UserId,
    /// Six decimal digits, uniformly drawn from 100000..=999999
    pub code: String,
    /// Expiry; rows past this are inert at read time
    pub expires_at: DateTime<Utc>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl EmailVerificationCode {
    /// Issue a fresh code for the user
    pub fn issue(user_id: UserId, ttl: Duration) -> Self {
        let code = rand::rng().random_range(100_000..=999_999).to_string();
        let now = Utc::now();

        Self {
            user_id,
            code,
            expires_at: now + ttl,
            created_at: now,
        }
    }

    /// Whether the code is past its expiry at the given instant
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl fmt::Debug for EmailVerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailVerificationCode")
            .field("user_id", &self.user_id)
            .field("code", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_six_decimal_digits() {
        for _ in 0..32 {
            let code = EmailVerificationCode::issue(UserId::new(), Duration::hours(24));
            assert_eq!(code.code.len(), 6);
            let n: u32 = code.code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn test_expiry_window() {
        let code = EmailVerificationCode::issue(UserId::new(), Duration::hours(24));
        assert_eq!(code.expires_at, code.created_at + Duration::hours(24));
        assert!(!code.is_expired(code.created_at));
        assert!(code.is_expired(code.expires_at));
    }

    #[test]
    fn test_debug_redacts_code() {
        let code = EmailVerificationCode::issue(UserId::new(), Duration::hours(24));
        let debug = format!("{:?}", code);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&code.code));
    }
}
