//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - single-instance, in-process
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Stores a new link and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the record could not be stored,
    /// including when the code is already taken.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link with its usage metadata by short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Resolves a short code to its destination URL only.
    ///
    /// This is the redirect hot path; implementations should read nothing else.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn find_destination_by_code(&self, code: &str) -> Result<Option<String>, AppError>;

    /// Records one click: `clicks + 1` and moves `last_clicked_at` forward to
    /// `clicked_at`.
    ///
    /// Must be a relative increment so that concurrent calls for the same code
    /// all take effect regardless of order. A missing code is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn record_click(&self, code: &str, clicked_at: DateTime<Utc>) -> Result<(), AppError>;

    /// Hard-deletes a link.
    ///
    /// Returns `Ok(true)` if a link was removed, `Ok(false)` if none matched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn delete_by_code(&self, code: &str) -> Result<bool, AppError>;

    /// Counts stored links and the sum of their clicks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn totals(&self) -> Result<LinkTotals, AppError>;

    /// Checks that the backing store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the store cannot be reached.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Aggregate counters over all links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkTotals {
    pub links: i64,
    pub clicks: i64,
}
