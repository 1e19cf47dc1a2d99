//! Application layer services implementing business logic.
//!
//! Services consume the repository traits and give HTTP handlers and the
//! admin CLI a narrow API.
//!
//! - [`services::link_service::LinkService`] - Short link creation, lookup, and deletion
//! - [`services::redirect_service::RedirectService`] - Redirect resolution and click dispatch

pub mod services;
