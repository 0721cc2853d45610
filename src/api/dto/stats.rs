//! DTOs for link statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::LinkStats;

/// Statistics for a specific short link. Returned for expired links as well.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub code: String,
    pub long_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: u64,
}

impl From<LinkStats> for StatsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            code: stats.code,
            long_url: stats.long_url,
            short_url: stats.short_url,
            created_at: stats.created_at,
            expires_at: stats.expires_at,
            click_count: stats.click_count,
        }
    }
}
