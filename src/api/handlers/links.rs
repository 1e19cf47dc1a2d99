//! Handlers for link management endpoints (create, inspect, delete).

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /urls`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created` with a `Location` header pointing at `/urls/{code}`:
///
/// ```json
/// {
///   "code": "21",
///   "short_url": "https://s.example.com/21",
///   "long_url": "https://example.com/some/long/path",
///   "clicks": 0,
///   "created_at": "2025-01-01T00:00:00Z",
///   "last_clicked_at": null
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is invalid or not allowed.
/// Returns 500 if the link could not be stored.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let link = state.link_service.create_short_link(&payload.url).await?;

    let location = format!("/urls/{}", link.code);
    let short_url = state.link_service.short_url(&link.code);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(LinkResponse::from_link(link, short_url)),
    ))
}

/// Returns link metadata including click counters.
///
/// # Endpoint
///
/// `GET /urls/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if no link matches the code.
pub async fn get_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(&code).await?;
    let short_url = state.link_service.short_url(&link.code);

    Ok(Json(LinkResponse::from_link(link, short_url)))
}

/// Permanently deletes a link.
///
/// # Endpoint
///
/// `DELETE /urls/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if no link matches the code.
pub async fn delete_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(&code).await?;

    Ok(StatusCode::NO_CONTENT)
}
