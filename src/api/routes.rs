//! API route configuration.

use crate::api::handlers::{create_link_handler, delete_link_handler, get_link_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link management routes.
///
/// # Endpoints
///
/// - `POST   /urls`          - Create a short URL
/// - `GET    /urls/{code}`   - Link metadata and click counters
/// - `DELETE /urls/{code}`   - Delete a link
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", post(create_link_handler))
        .route(
            "/urls/{code}",
            get(get_link_handler).delete(delete_link_handler),
        )
}
