//! Click event model for asynchronous click counting.

use chrono::{DateTime, Utc};

/// A successful redirect waiting to be counted.
///
/// Sent from redirect handlers to [`crate::domain::click_worker::run_click_worker`]
/// over a bounded channel, so the HTTP response never waits on the counter update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub code: String,
    pub clicked_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates a click event stamped with the current time.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            clicked_at: Utc::now(),
        }
    }
}
