//! Source of unique link identities.

use crate::error::AppError;
use async_trait::async_trait;

/// Issues unique, monotonically increasing link identities.
///
/// Every call returns a value no other call has returned or will return.
/// Gaps are allowed: an identity drawn for a link that is never stored is
/// simply skipped.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgIdentitySource`] - PostgreSQL sequence
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - atomic counter,
///   single instance only
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Returns the next identity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the source is unreachable.
    async fn next_identity(&self) -> Result<i64, AppError>;
}
