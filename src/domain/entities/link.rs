//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A stored short link.
///
/// A link is created once and never rewritten by the shortening core.
/// `disabled` is flipped only by administrative tooling, and expiry is a
/// read-time judgement: an expired row stays in storage until purged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub code: String,
    pub target: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub disabled: bool,
    pub custom_alias: Option<String>,
    pub owner_id: Option<i64>,
}

impl Link {
    /// Returns true if the link has passed its expiry time at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e <= now)
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: String,
    pub target: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub custom_alias: Option<String>,
}

impl From<NewLink> for Link {
    fn from(new_link: NewLink) -> Self {
        Self {
            code: new_link.code,
            target: new_link.target,
            created_at: new_link.created_at,
            expires_at: new_link.expires_at,
            disabled: false,
            custom_alias: new_link.custom_alias,
            owner_id: None,
        }
    }
}
