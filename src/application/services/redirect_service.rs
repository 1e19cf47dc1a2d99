//! Redirect resolution with decoupled click recording.

use std::sync::Arc;

use metrics::counter;
use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_codec::is_valid_syntax;

/// Resolves short codes for the redirect endpoint.
///
/// The redirect answer depends on the lookup alone. Click recording is
/// handed to the background worker through a bounded channel with
/// `try_send`: if the queue is full or the worker is gone, the click is
/// dropped and logged, and the redirect still succeeds.
pub struct RedirectService {
    link_repository: Arc<dyn LinkRepository>,
    click_sender: mpsc::Sender<ClickEvent>,
}

impl RedirectService {
    /// Creates a new redirect service.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        click_sender: mpsc::Sender<ClickEvent>,
    ) -> Self {
        Self {
            link_repository,
            click_sender,
        }
    }

    /// Resolves a short code to its destination and schedules a click.
    ///
    /// # Flow
    ///
    /// 1. Reject codes that are not Base62 before any lookup
    /// 2. Look up the destination
    /// 3. On a hit, offer a [`ClickEvent`] to the worker without waiting
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCode`] for malformed codes.
    /// Returns [`AppError::NotFound`] if no link matches.
    /// Returns [`AppError::Persistence`] if the lookup itself fails.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        if !is_valid_syntax(code) {
            debug!(code, "Rejected malformed short code");
            return Err(AppError::invalid_code(
                "Invalid short code format",
                json!({ "code": code }),
            ));
        }

        let long_url = self
            .link_repository
            .find_destination_by_code(code)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short code not found", json!({ "code": code }))
            })?;

        self.dispatch_click(code);

        Ok(long_url)
    }

    /// Offers a click event to the worker. Never blocks, never fails.
    fn dispatch_click(&self, code: &str) {
        match self.click_sender.try_send(ClickEvent::new(code)) {
            Ok(()) => {
                counter!("clicks_enqueued_total").increment(1);
            }
            Err(TrySendError::Full(event)) => {
                counter!("clicks_dropped_total", "reason" => "queue_full").increment(1);
                warn!(code = %event.code, "Click queue full, dropping click");
            }
            Err(TrySendError::Closed(event)) => {
                counter!("clicks_dropped_total", "reason" => "queue_closed").increment(1);
                warn!(code = %event.code, "Click queue closed, dropping click");
            }
        }
    }

    /// Returns true while the click worker is still receiving.
    pub fn is_recording(&self) -> bool {
        !self.click_sender.is_closed()
    }

    /// Free slots in the click queue.
    pub fn queue_capacity(&self) -> usize {
        self.click_sender.capacity()
    }
}
