//! Profile Use Cases
//!
//! Read and edit the authenticated user's own account: display name and
//! password changes. Claims carry a stale snapshot until the next token
//! issue, so reads always hit the user store.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    display_name::DisplayName,
    user_id::UserId,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Profile as exposed to the account owner
#[derive(Debug, Clone)]
pub struct ProfileOutput {
    pub public_id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    /// OAuth-only accounts have no password credential
    pub has_password: bool,
    pub avatar_url: Option<String>,
}

impl From<&User> for ProfileOutput {
    fn from(user: &User) -> Self {
        Self {
            public_id: user.public_id.to_string(),
            name: user.name.to_string(),
            email: user.email.to_string(),
            email_verified: user.email_verified,
            has_password: user.has_password(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

/// Use case: fetch the current profile
pub struct GetProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> GetProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<ProfileOutput> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(ProfileOutput::from(&user))
    }
}

/// Use case: change the display name
pub struct EditProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> EditProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: &UserId, name: &str) -> AuthResult<ProfileOutput> {
        let name = DisplayName::new(name)?;

        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.user_repo.update_name(user_id, &name).await?;
        user.set_name(name);

        tracing::info!(public_id = %user.public_id, "Display name updated");

        Ok(ProfileOutput::from(&user))
    }
}

/// Parameters for a password change
#[derive(Debug)]
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

/// Use case: change the password, proving knowledge of the current one
pub struct ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, user_id: &UserId, input: ChangePasswordInput) -> AuthResult<()> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // An unparseable current password cannot be the stored one; fold it
        // into the same failure as a wrong password. OAuth-only accounts
        // (no credential) land here too.
        let current = RawPassword::new(input.current_password)
            .map_err(|_| AuthError::InvalidCredentials)?;
        let stored = user
            .password_hash
            .as_ref()
            .ok_or(AuthError::InvalidCredentials)?;
        if !stored.verify(&current, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let new_raw = RawPassword::new(input.new_password)?;
        let new_password = UserPassword::from_raw(&new_raw, self.config.pepper())?;

        self.user_repo.update_password(user_id, &new_password).await?;

        tracing::info!(public_id = %user.public_id, "Password changed");

        Ok(())
    }
}
