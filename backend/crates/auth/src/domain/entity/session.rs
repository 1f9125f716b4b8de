//! Session Entity
//!
//! Server-side record of an authenticated session. Bearer tokens reference
//! the row by `session_id`; logout deletes it, which is the only way to
//! revoke an otherwise still-valid refresh token.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::value_object::user_id::UserId;

/// Client metadata captured at session creation
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Session entity
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID (UUID v4, carried in token claims as `sid`)
    pub session_id: Uuid,
    /// Owning user
    pub user_id: UserId,
    /// Sessions with `valid = false` are rejected by refresh
    pub valid: bool,
    /// Client IP (optional, for session management display)
    pub client_ip: Option<String>,
    /// User agent string (optional)
    pub user_agent: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session with a fresh UUID
    pub fn new(user_id: UserId, client: ClientMeta) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            user_id,
            valid: true,
            client_ip: client.ip,
            user_agent: client.user_agent,
            created_at: now,
            updated_at: now,
        }
    }

    /// Flag the session as no longer usable for refresh
    pub fn invalidate(&mut self) {
        self.valid = false;
        self.updated_at = Utc::now();
    }
}
