//! OAuth Provider Value Object
//!
//! Identifies an upstream identity provider. The canonical form is a short
//! lowercase ASCII token (`"google"`); provider rows are keyed on it.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Maximum provider identifier length
const PROVIDER_MAX_LENGTH: usize = 32;

/// Validated OAuth provider identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct OauthProvider(String);

impl OauthProvider {
    /// Create a provider identifier with validation
    pub fn new(provider: impl Into<String>) -> AppResult<Self> {
        let provider = provider.into();

        if provider.is_empty() {
            return Err(AppError::bad_request("Provider cannot be empty"));
        }

        if provider.len() > PROVIDER_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Provider must be at most {} characters",
                PROVIDER_MAX_LENGTH
            )));
        }

        if !provider
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(AppError::bad_request(
                "Provider must be lowercase ASCII (a-z, 0-9, _)",
            ));
        }

        Ok(Self(provider))
    }

    /// The Google provider
    pub fn google() -> Self {
        Self("google".to_string())
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(provider: impl Into<String>) -> Self {
        Self(provider.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for OauthProvider {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
