//! In-memory implementation of the link repository.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Immutable identity of a stored link plus its separately updated counter.
#[derive(Debug)]
struct StoredLink {
    long_url: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    clicks: AtomicU64,
}

impl StoredLink {
    fn to_link(&self, code: &str) -> Link {
        Link::new(
            code.to_string(),
            self.long_url.clone(),
            self.created_at,
            self.expires_at,
            self.clicks.load(Ordering::Acquire),
        )
    }
}

/// Link repository backed by [`DashMap`].
///
/// DashMap shards its locks, so lookups and counter updates on different codes
/// proceed in parallel. Inserts go through the entry API, which makes the
/// uniqueness check and the insert a single atomic step. Click counters are
/// `AtomicU64`s updated under a shard read guard.
///
/// A secondary index maps each URL to its codes in insertion order. It carries no
/// uniqueness guarantee: concurrent first-time creations of one URL can both
/// insert, and lookups by URL then return the earliest code still stored.
///
/// Lock order is `links` then `codes_by_url`; nothing takes them the other way.
#[derive(Debug, Default)]
pub struct InMemoryLinkRepository {
    links: DashMap<String, StoredLink>,
    codes_by_url: DashMap<String, Vec<String>>,
}

impl InMemoryLinkRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty repository with room for `capacity` links.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: DashMap::with_capacity(capacity),
            codes_by_url: DashMap::with_capacity(capacity),
        }
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        match self.links.entry(new_link.code.clone()) {
            Entry::Occupied(_) => return Err(AppError::code_conflict(&new_link.code)),
            Entry::Vacant(slot) => {
                // Indexed while the shard is still held, so a delete of this code
                // cannot run between the two writes.
                self.codes_by_url
                    .entry(new_link.long_url.clone())
                    .or_default()
                    .push(new_link.code.clone());

                slot.insert(StoredLink {
                    long_url: new_link.long_url.clone(),
                    created_at: new_link.created_at,
                    expires_at: new_link.expires_at,
                    clicks: AtomicU64::new(0),
                });
            }
        }

        Ok(new_link.into_link())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.get(code).map(|stored| stored.to_link(code)))
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Link>, AppError> {
        let Some(codes) = self.codes_by_url.get(long_url).map(|c| c.value().clone()) else {
            return Ok(None);
        };

        Ok(codes
            .iter()
            .find_map(|code| self.links.get(code).map(|stored| stored.to_link(code))))
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.contains_key(code))
    }

    async fn increment_clicks(&self, code: &str) -> Result<bool, AppError> {
        let Some(stored) = self.links.get(code) else {
            return Ok(false);
        };

        stored.clicks.fetch_add(1, Ordering::AcqRel);
        Ok(true)
    }

    async fn delete(&self, code: &str) -> Result<(), AppError> {
        let (_, stored) = self
            .links
            .remove(code)
            .ok_or_else(|| AppError::link_not_found(code))?;

        if let Some(mut codes) = self.codes_by_url.get_mut(&stored.long_url) {
            codes.retain(|indexed| indexed != code);
        }
        self.codes_by_url
            .remove_if(&stored.long_url, |_, codes| codes.is_empty());

        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.links.len() as i64)
    }
}
