//! Entity Module

pub mod email_verification;
pub mod oauth_account;
pub mod password_reset;
pub mod session;
pub mod user;
