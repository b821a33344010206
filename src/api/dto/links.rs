//! DTOs for the link listing endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// All registered links, in creation order.
#[derive(Debug, Serialize)]
pub struct LinksResponse {
    pub count: usize,
    pub items: Vec<LinkItem>,
}

#[derive(Debug, Serialize)]
pub struct LinkItem {
    pub code: String,
    pub short_url: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
}
