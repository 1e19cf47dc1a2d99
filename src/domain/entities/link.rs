//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL link with usage metadata.
///
/// `id` is the identity the code was encoded from, so `decode(code) == id`.
/// `clicks` and `last_clicked_at` are only ever changed by the click worker;
/// everything else is fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub long_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub last_clicked_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        code: String,
        long_url: String,
        clicks: i64,
        created_at: DateTime<Utc>,
        last_clicked_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            code,
            long_url,
            clicks,
            created_at,
            last_clicked_at,
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub id: i64,
    pub code: String,
    pub long_url: String,
}
