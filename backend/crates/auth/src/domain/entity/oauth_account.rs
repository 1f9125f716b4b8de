//! OAuth Account Entity
//!
//! Links a local user to one upstream identity. Unique on
//! (provider, provider_account_id).

use chrono::{DateTime, Utc};

use crate::domain::value_object::{oauth_provider::OauthProvider, user_id::UserId};

/// OAuth account link
#[derive(Debug, Clone)]
pub struct OauthAccount {
    /// Owning user
    pub user_id: UserId,
    /// Provider identifier (e.g. "google")
    pub provider: OauthProvider,
    /// Stable account id issued by the provider (`sub` for OpenID)
    pub provider_account_id: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl OauthAccount {
    /// Create a new link
    pub fn new(user_id: UserId, provider: OauthProvider, provider_account_id: String) -> Self {
        Self {
            user_id,
            provider,
            provider_account_id,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_link() {
        let user_id = UserId::new();
        let link = OauthAccount::new(user_id, OauthProvider::google(), "sub-123".to_string());

        assert_eq!(link.user_id, user_id);
        assert_eq!(link.provider.as_str(), "google");
        assert_eq!(link.provider_account_id, "sub-123");
    }
}
