//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::{
    email_verification::EmailVerificationCode, oauth_account::OauthAccount,
    password_reset::PasswordResetToken, session::Session, user::User,
};
use crate::domain::value_object::{
    display_name::DisplayName, email::Email, oauth_provider::OauthProvider, user_id::UserId,
    user_password::UserPassword,
};
use crate::error::AuthResult;
use uuid::Uuid;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    ///
    /// A unique violation on the email column surfaces as `AlreadyExists`.
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by internal ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by email (exact match on the stored string)
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if an email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Update the display name
    async fn update_name(&self, user_id: &UserId, name: &DisplayName) -> AuthResult<()>;

    /// Store a new password hash
    async fn update_password(
        &self,
        user_id: &UserId,
        password_hash: &UserPassword,
    ) -> AuthResult<()>;

    /// Set `email_verified = true`
    async fn mark_email_verified(&self, user_id: &UserId) -> AuthResult<()>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session
    async fn create(&self, session: &Session) -> AuthResult<()>;

    /// Find session by ID
    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<Session>>;

    /// Delete a session; idempotent (deleting a missing row is Ok)
    async fn delete(&self, session_id: Uuid) -> AuthResult<()>;
}

/// A user looked up for OAuth resolution, together with their link for the
/// provider in question (if any)
#[derive(Debug, Clone)]
pub struct UserWithProviderLink {
    pub user: User,
    pub link: Option<OauthAccount>,
}

/// OAuth account repository trait
#[trait_variant::make(OauthAccountRepository: Send)]
pub trait LocalOauthAccountRepository {
    /// Find the user owning `email` plus their link for `provider`, if either exists
    async fn find_user_with_link(
        &self,
        provider: &OauthProvider,
        email: &Email,
    ) -> AuthResult<Option<UserWithProviderLink>>;

    /// Insert a link for an existing user
    ///
    /// Backfills the user's `avatar_url` from the claims only when the
    /// column is currently NULL.
    async fn link_account(&self, link: &OauthAccount, avatar_url: Option<&str>)
    -> AuthResult<()>;

    /// Create a new user and their link atomically (both writes or neither)
    async fn create_user_with_link(&self, user: &User, link: &OauthAccount) -> AuthResult<()>;
}

/// Email verification code repository trait
#[trait_variant::make(EmailVerificationRepository: Send)]
pub trait LocalEmailVerificationRepository {
    /// Store a fresh code, replacing any existing codes for the user
    ///
    /// One transaction: delete the user's codes, drop globally expired
    /// rows, insert the new one.
    async fn replace_code(&self, code: &EmailVerificationCode) -> AuthResult<()>;

    /// Atomically consume an unexpired code matching (email, code)
    ///
    /// Deletes the row and any remaining codes for that user; returns the
    /// owning user id, or `None` when no live row matched.
    async fn consume_code(&self, email: &Email, code: &str) -> AuthResult<Option<UserId>>;
}

/// Password reset token repository trait
#[trait_variant::make(PasswordResetRepository: Send)]
pub trait LocalPasswordResetRepository {
    /// Store a fresh token hash, replacing any existing tokens for the user
    async fn replace_token(&self, token: &PasswordResetToken) -> AuthResult<()>;

    /// Atomically consume an unexpired token and store the new password hash
    ///
    /// One transaction: delete the matching row, update the owning user's
    /// password. Returns the user id, or `None` when no live row matched.
    async fn consume_token(
        &self,
        token_hash: &str,
        new_password: &UserPassword,
    ) -> AuthResult<Option<UserId>>;
}
