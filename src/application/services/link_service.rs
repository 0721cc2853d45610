//! Short code assignment service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::code_generator::CodeGenerator;
use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Default number of draws for a generated code before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Service deciding which short code identifies an original URL.
///
/// Creation is deduplicated by content: submitting a URL that already has a
/// mapping returns that mapping untouched. Code uniqueness is ultimately enforced by
/// the repository; a rejected insert surfaces as [`AppError::Conflict`].
pub struct LinkService<L: LinkRepository + ?Sized, G: CodeGenerator + ?Sized> {
    link_repository: Arc<L>,
    code_generator: Arc<G>,
    base_url: String,
    max_attempts: usize,
}

impl<L: LinkRepository + ?Sized, G: CodeGenerator + ?Sized> LinkService<L, G> {
    /// Creates a new link service.
    pub fn new(
        link_repository: Arc<L>,
        code_generator: Arc<G>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_repository,
            code_generator,
            base_url: base_url.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Sets how many generated codes are tried before failing. Clamped to at least 1.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Returns or creates the mapping for `long_url`.
    ///
    /// # Deduplication
    ///
    /// If a link for the exact same URL exists, it is returned as-is; `custom_code`
    /// and `expires_at` are ignored in that case.
    ///
    /// # Code Selection
    ///
    /// - A non-empty `custom_code` is used verbatim; if taken, fails immediately
    /// - Otherwise codes are drawn from the generator, retrying on collision up to
    ///   the configured attempt limit
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] carrying the code if the custom code is taken,
    /// or if every generated code collided.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn create_short_link(
        &self,
        long_url: String,
        custom_code: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        if let Some(existing) = self.link_repository.find_by_long_url(&long_url).await? {
            debug!(code = %existing.code, "Returning existing link for URL");
            metrics::counter!("link_dedup_hits_total").increment(1);
            return Ok(existing);
        }

        let link = match custom_code.filter(|c| !c.is_empty()) {
            Some(code) => self.create_with_custom_code(code, long_url, expires_at).await?,
            None => self.create_with_generated_code(long_url, expires_at).await?,
        };

        info!(code = %link.code, "Short link created");
        metrics::counter!("links_created_total").increment(1);

        Ok(link)
    }

    /// Builds the public short URL for `code`.
    pub fn get_short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }

    async fn create_with_custom_code(
        &self,
        code: String,
        long_url: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        if self.link_repository.exists_by_code(&code).await? {
            return Err(AppError::code_conflict(&code));
        }

        self.link_repository
            .create(new_link(code, long_url, expires_at))
            .await
    }

    /// Draws codes until one is accepted by the repository.
    ///
    /// A draw is retried both when the existence check finds it taken and when the
    /// insert loses a race to a concurrent writer.
    async fn create_with_generated_code(
        &self,
        long_url: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        let mut last_code = String::new();

        for attempt in 1..=self.max_attempts {
            let code = self.code_generator.generate();

            if !self.link_repository.exists_by_code(&code).await? {
                match self
                    .link_repository
                    .create(new_link(code.clone(), long_url.clone(), expires_at))
                    .await
                {
                    Err(AppError::Conflict { .. }) => {}
                    result => return result,
                }
            }

            warn!(%code, attempt, "Generated code collided");
            metrics::counter!("code_collisions_total").increment(1);
            last_code = code;
        }

        Err(AppError::code_conflict(&last_code))
    }
}

fn new_link(code: String, long_url: String, expires_at: Option<DateTime<Utc>>) -> NewLink {
    NewLink {
        code,
        long_url,
        created_at: Utc::now(),
        expires_at,
    }
}
