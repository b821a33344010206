//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::short_link::{request_origin, short_url};

/// Creates a short link, or returns the existing one for a known URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created` for a new link, `200 OK` when the URL was already
/// registered:
///
/// ```json
/// {
///   "code": "a1b2c3",
///   "short_url": "http://localhost:8080/a1b2c3",
///   "long_url": "https://example.com/some/long/path"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is empty or the body is not a valid
/// request document.
/// Returns 500 Internal Server Error if the link could not be stored.
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let outcome = state.registry.shorten(&payload.url).await?;
    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    let origin = request_origin(&headers, &state.public_base_url);
    let code = outcome.into_short_id();

    Ok((
        status,
        Json(ShortenResponse {
            short_url: short_url(&origin, &code),
            code,
            long_url: payload.url,
        }),
    ))
}
