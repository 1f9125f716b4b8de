//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod google;
pub mod postgres;
pub mod smtp;

pub use google::{GoogleConfig, GoogleOauthClient};
pub use postgres::PgAuthRepository;
pub use smtp::{SmtpConfig, SmtpMailer};
