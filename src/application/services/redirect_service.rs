//! Redirect resolution, click counting, stats and removal.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::entities::LinkStats;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Service resolving short codes back to their targets.
///
/// Expiration is evaluated against the clock on every resolution and never cached.
/// Only [`Self::resolve`] is gated on expiration; stats stay visible after the
/// deadline and click recording does not look at it.
pub struct RedirectService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    base_url: String,
}

impl<L: LinkRepository + ?Sized> RedirectService<L> {
    /// Creates a new redirect service.
    pub fn new(link_repository: Arc<L>, base_url: impl Into<String>) -> Self {
        Self {
            link_repository,
            base_url: base_url.into(),
        }
    }

    /// Resolves `code` to its original URL. Has no side effects.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Expired`] if the link's deadline has passed.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        self.resolve_at(code, Utc::now()).await
    }

    /// Resolves `code` as of `now`.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`].
    pub async fn resolve_at(&self, code: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        let link = self
            .link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::link_not_found(code))?;

        if link.is_expired_at(now) {
            return Err(AppError::link_expired(code));
        }

        Ok(link.long_url)
    }

    /// Counts one click for `code`.
    ///
    /// Unknown codes are ignored: click counting is best-effort and must never fail
    /// the redirect that triggered it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn record_click(&self, code: &str) -> Result<(), AppError> {
        if self.link_repository.increment_clicks(code).await? {
            metrics::counter!("clicks_recorded_total").increment(1);
        } else {
            debug!(%code, "Click for unknown code ignored");
        }

        Ok(())
    }

    /// Returns the read view of a link, including expired ones.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn stats(&self, code: &str) -> Result<LinkStats, AppError> {
        let link = self
            .link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::link_not_found(code))?;

        Ok(LinkStats::from_link(link, &self.base_url))
    }

    /// Permanently deletes a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn remove(&self, code: &str) -> Result<(), AppError> {
        if !self.link_repository.exists_by_code(code).await? {
            return Err(AppError::link_not_found(code));
        }

        self.link_repository.delete(code).await?;
        info!(%code, "Short link removed");

        Ok(())
    }

    /// Number of stored links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn count_links(&self) -> Result<i64, AppError> {
        self.link_repository.count().await
    }
}
