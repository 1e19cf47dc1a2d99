//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET    /{code}`       - Short link redirect
//! - `GET    /health`       - Health check: storage, click queue
//! - `POST   /urls`         - Create a short URL
//! - `GET    /urls/{code}`  - Link metadata
//! - `DELETE /urls/{code}`  - Delete a link
//!
//! Codes equal to a static segment (`urls`, `health`) are never issued, so the
//! static routes cannot shadow a live link.

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;

/// Constructs the application router with all routes and middleware.
///
/// Trailing-slash normalization is applied around this router when serving
/// (see [`crate::server::run`]).
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .merge(api::routes::link_routes())
        .with_state(state)
        .layer(tracing::layer())
}
