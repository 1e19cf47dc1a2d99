//! DTOs for the link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// The destination URL (HTTP or HTTPS, at most 2048 characters).
    #[validate(url(message = "Invalid URL format"))]
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
}

/// A link as returned by the API.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LinkResponse {
    pub code: String,
    pub short_url: String,
    pub long_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub last_clicked_at: Option<DateTime<Utc>>,
}

impl LinkResponse {
    /// Builds the response from a link and its full short URL.
    pub fn from_link(link: Link, short_url: String) -> Self {
        Self {
            code: link.code,
            short_url,
            long_url: link.long_url,
            clicks: link.clicks,
            created_at: link.created_at,
            last_clicked_at: link.last_clicked_at,
        }
    }
}
