//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Reject codes that are not Base62 (400, no lookup)
/// 2. Resolve the destination
/// 3. Queue a click event for the background worker
/// 4. Return 303 See Other
///
/// The response never waits on click recording. If the click queue is full
/// the click is dropped, not the redirect.
///
/// # Errors
///
/// Returns 400 Bad Request for a malformed code.
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let long_url = state.redirect_service.resolve(&code).await?;

    Ok(Redirect::to(&long_url))
}
