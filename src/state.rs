use std::sync::Arc;

use crate::application::services::LinkRegistry;

/// Shared handler state.
///
/// The registry is constructed once at startup and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<LinkRegistry>,
    /// Origin used for short links when a request carries no `Host` header.
    pub public_base_url: String,
}

impl AppState {
    pub fn new(registry: Arc<LinkRegistry>, public_base_url: impl Into<String>) -> Self {
        Self {
            registry,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }
}
