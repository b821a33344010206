//! Handler for the link listing endpoint.

use axum::{Json, extract::State, http::HeaderMap};

use crate::api::dto::links::{LinkItem, LinksResponse};
use crate::state::AppState;
use crate::utils::short_link::{request_origin, short_url};

/// Lists every registered link in creation order.
///
/// # Endpoint
///
/// `GET /api/links`
///
/// # Response
///
/// ```json
/// {
///   "count": 1,
///   "items": [
///     {
///       "code": "a1b2c3",
///       "short_url": "http://localhost:8080/a1b2c3",
///       "long_url": "https://example.com",
///       "created_at": "2026-10-19T12:03:22.123Z"
///     }
///   ]
/// }
/// ```
pub async fn list_links_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<LinksResponse> {
    let origin = request_origin(&headers, &state.public_base_url);

    let items: Vec<LinkItem> = state
        .registry
        .list_all()
        .await
        .into_iter()
        .map(|entry| LinkItem {
            short_url: short_url(&origin, &entry.short_id),
            code: entry.short_id,
            long_url: entry.original_url,
            created_at: entry.created_at,
        })
        .collect();

    Json(LinksResponse {
        count: items.len(),
        items,
    })
}
