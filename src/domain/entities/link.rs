//! Link entry representing one short id bound to an original URL.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered short link.
///
/// Entries are immutable once created: the registry never updates or
/// removes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEntry {
    pub short_id: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl LinkEntry {
    /// Creates a new LinkEntry instance.
    pub fn new(short_id: String, original_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            short_id,
            original_url,
            created_at,
        }
    }

    /// Creates an entry stamped with the current time.
    pub fn created_now(short_id: String, original_url: String) -> Self {
        Self::new(short_id, original_url, Utc::now())
    }
}
