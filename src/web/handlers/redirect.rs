//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use crate::error::AppError;
use crate::state::AppState;
use crate::web::error::HtmlError;

/// Redirects a short id to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Responds `307 Temporary Redirect` with the stored URL as `Location`,
/// byte for byte.
///
/// # Errors
///
/// Returns the 404 page if the id is not registered.
/// Returns the 500 page if the stored URL cannot be sent as a header.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, HtmlError> {
    let long_url = state.registry.resolve(&code).await?;

    let location = HeaderValue::try_from(long_url).map_err(|e| {
        warn!(code = %code, error = %e, "Stored URL is not a valid Location header");
        AppError::internal("Stored URL cannot be used as a redirect target", json!({}))
    })?;

    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response())
}
