//! Register Use Case
//!
//! Creates a new user account with credentials. No session is issued;
//! the user signs in separately.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    display_name::DisplayName,
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<User> {
        // Validate inputs
        let name = DisplayName::new(&input.name)?;
        let email = Email::new(input.email)?;

        // Reject taken emails up front; the unique index still backstops races
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::AlreadyExists);
        }

        // Validate and hash password
        let raw_password = RawPassword::new(input.password)?;
        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        let user = User::new(name, email, password_hash);
        self.user_repo.create(&user).await?;

        tracing::info!(public_id = %user.public_id, "User registered");

        Ok(user)
    }
}
