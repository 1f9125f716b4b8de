//! Domain Layer
//!
//! Contains entities, value objects, repository traits, and gateway traits.

pub mod entity;
pub mod gateway;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{session::Session, user::User};
pub use gateway::{EmailSender, OauthClient};
pub use repository::{
    EmailVerificationRepository, OauthAccountRepository, PasswordResetRepository,
    SessionRepository, UserRepository,
};
