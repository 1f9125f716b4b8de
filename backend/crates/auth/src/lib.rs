//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations and external services
//!
//! ## Features
//! - User registration/login with email + password
//! - Google OAuth sign-in with automatic account linking
//! - Stateless JWT access tokens backed by server-side sessions
//! - Email verification codes and single-use password reset tokens
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optionally peppered
//! - Access tokens live 15 minutes; refresh tokens 7 days
//! - Logout deletes the session, revoking every refresh token minted for it
//! - Login failures are indistinguishable (no account enumeration)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
}

pub mod store {
    pub use crate::infra::postgres::PgAuthRepository as AuthStore;
}
