//! Click event model for asynchronous usage recording.

use chrono::{DateTime, Utc};

/// A request to record one click on a short code.
///
/// Produced by the redirect path and consumed by
/// [`crate::domain::click_worker::run_click_worker`]. Carrying the click time
/// in the event keeps `last_clicked_at` accurate even when the worker is
/// behind.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub code: String,
    pub clicked_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates a click event stamped with the current time.
    pub fn new(code: impl Into<String>) -> Self {
        Self::at(code, Utc::now())
    }

    /// Creates a click event with an explicit timestamp.
    pub fn at(code: impl Into<String>, clicked_at: DateTime<Utc>) -> Self {
        Self {
            code: code.into(),
            clicked_at,
        }
    }
}
