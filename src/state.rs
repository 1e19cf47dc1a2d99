//! Shared application state injected into HTTP handlers.

use std::sync::Arc;

use crate::application::services::{LinkService, RedirectService};

/// Services shared by every request.
///
/// Cloning is cheap; all fields are reference-counted. The redirect service
/// owns the click queue sender, so dropping the last state clone closes the
/// queue and lets the click worker drain and stop.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService>, redirect_service: Arc<RedirectService>) -> Self {
        Self {
            link_service,
            redirect_service,
        }
    }
}
