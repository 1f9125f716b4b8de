//! User Entity
//!
//! Core user entity. Carries the (optional) password hash: accounts created
//! through OAuth have none until the user sets one.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, public_id::PublicId, user_id::UserId,
    user_password::UserPassword,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Public-facing nanoid identifier (URL-safe, used in token claims)
    pub public_id: PublicId,
    /// Display name
    pub name: DisplayName,
    /// Email address (unique, case-preserving)
    pub email: Email,
    /// Argon2id PHC hash; `None` for OAuth-created accounts
    pub password_hash: Option<UserPassword>,
    /// Avatar URL, if any
    pub avatar_url: Option<String>,
    /// Whether the email address has been confirmed
    pub email_verified: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with credentials (registration path)
    pub fn new(name: DisplayName, email: Email, password_hash: UserPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            public_id: PublicId::new(),
            name,
            email,
            password_hash: Some(password_hash),
            avatar_url: None,
            email_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new user from OAuth claims (no password)
    ///
    /// The provider has already verified the email address, so the account
    /// starts out verified.
    pub fn new_from_oauth(name: DisplayName, email: Email, avatar_url: Option<String>) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            public_id: PublicId::new(),
            name,
            email,
            password_hash: None,
            avatar_url,
            email_verified: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this account can authenticate with a password
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Update display name
    pub fn set_name(&mut self, name: DisplayName) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    /// Store a new password hash
    pub fn set_password(&mut self, password_hash: UserPassword) {
        self.password_hash = Some(password_hash);
        self.updated_at = Utc::now();
    }

    /// Mark the email address as confirmed
    pub fn mark_email_verified(&mut self) {
        self.email_verified = true;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::RawPassword;

    fn hash(raw: &str) -> UserPassword {
        let raw = RawPassword::new(raw.to_string()).unwrap();
        UserPassword::from_raw(&raw, None).unwrap()
    }

    #[test]
    fn test_new_user_starts_unverified() {
        let user = User::new(
            DisplayName::new("Alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
            hash("secret1"),
        );

        assert!(!user.email_verified);
        assert!(user.has_password());
        assert!(user.avatar_url.is_none());
    }

    #[test]
    fn test_oauth_user_starts_verified_without_password() {
        let user = User::new_from_oauth(
            DisplayName::new("Alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
            Some("https://example.com/a.png".to_string()),
        );

        assert!(user.email_verified);
        assert!(!user.has_password());
        assert_eq!(user.avatar_url.as_deref(), Some("https://example.com/a.png"));
    }

    #[test]
    fn test_debug_does_not_leak_hash() {
        let user = User::new(
            DisplayName::new("Alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
            hash("secret1"),
        );

        let phc = user
            .password_hash
            .as_ref()
            .unwrap()
            .as_phc_string()
            .to_string();
        let debug = format!("{:?}", user);
        assert!(!debug.contains(&phc));
    }
}
