//! In-process link storage and identity counter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{IdentitySource, LinkRepository, LinkTotals};
use crate::error::AppError;

/// Link storage kept in a [`DashMap`], plus an atomic identity counter.
///
/// Implements both [`LinkRepository`] and [`IdentitySource`]. The counter is
/// local to the process, so this backend is only correct for a single
/// instance; it is meant for development and tests.
///
/// Click increments take the per-entry write guard, so concurrent
/// `record_click` calls on one code are applied one after another and none
/// is lost.
#[derive(Debug)]
pub struct InMemoryLinkRepository {
    links: DashMap<String, Link>,
    next_id: AtomicI64,
}

impl InMemoryLinkRepository {
    /// Creates an empty repository whose first identity is `1`.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates an empty repository whose first identity is `first_id`.
    pub fn starting_at(first_id: i64) -> Self {
        Self {
            links: DashMap::new(),
            next_id: AtomicI64::new(first_id),
        }
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns true if no links are stored.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl Default for InMemoryLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentitySource for InMemoryLinkRepository {
    async fn next_identity(&self) -> Result<i64, AppError> {
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        match self.links.entry(new_link.code.clone()) {
            Entry::Occupied(_) => Err(AppError::persistence(
                "Short code already exists",
                json!({ "code": new_link.code }),
            )),
            Entry::Vacant(slot) => {
                let link = Link::new(
                    new_link.id,
                    new_link.code,
                    new_link.long_url,
                    0,
                    Utc::now(),
                    None,
                );
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.get(code).map(|l| l.value().clone()))
    }

    async fn find_destination_by_code(&self, code: &str) -> Result<Option<String>, AppError> {
        Ok(self.links.get(code).map(|l| l.long_url.clone()))
    }

    async fn record_click(&self, code: &str, clicked_at: DateTime<Utc>) -> Result<(), AppError> {
        if let Some(mut link) = self.links.get_mut(code) {
            link.clicks += 1;
            link.last_clicked_at = Some(match link.last_clicked_at {
                Some(last) if last > clicked_at => last,
                _ => clicked_at,
            });
        }
        Ok(())
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.remove(code).is_some())
    }

    async fn totals(&self) -> Result<LinkTotals, AppError> {
        let mut totals = LinkTotals::default();
        for link in self.links.iter() {
            totals.links += 1;
            totals.clicks += link.clicks;
        }
        Ok(totals)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
