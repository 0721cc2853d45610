//! Link entity representing a short code to URL mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A shortened URL mapping with its click counter.
///
/// Everything except `click_count` is fixed at creation. The counter is a snapshot
/// taken when the link was read from the store; stores keep it separately from the
/// identity so it can be incremented atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: u64,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        code: String,
        long_url: String,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        click_count: u64,
    ) -> Self {
        Self {
            code,
            long_url,
            created_at,
            expires_at,
            click_count,
        }
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns true if the link is expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now > e)
    }

    /// Builds the public short URL for this link under `base_url`.
    pub fn short_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.code)
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewLink {
    /// Materializes the stored link with a zeroed counter.
    pub fn into_link(self) -> Link {
        Link::new(self.code, self.long_url, self.created_at, self.expires_at, 0)
    }
}

/// Read view of a link returned by the stats operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub code: String,
    pub long_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: u64,
}

impl LinkStats {
    pub fn from_link(link: Link, base_url: &str) -> Self {
        let short_url = link.short_url(base_url);
        Self {
            code: link.code,
            long_url: link.long_url,
            short_url,
            created_at: link.created_at,
            expires_at: link.expires_at,
            click_count: link.click_count,
        }
    }
}
