//! HTML error pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::domain::errors::RegistryError;
use crate::error::AppError;

/// Template for the error page.
///
/// Renders `templates/error.html` with the status code, its reason phrase
/// and a human-readable message.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub code: u16,
    pub reason: String,
    pub message: String,
}

/// An [`AppError`] rendered as an HTML page instead of JSON.
#[derive(Debug)]
pub struct HtmlError(pub AppError);

impl From<AppError> for HtmlError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl From<RegistryError> for HtmlError {
    fn from(e: RegistryError) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let page = ErrorTemplate {
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.0.message().to_string(),
        };

        (status, page).into_response()
    }
}

/// Renders the 404 page for any unmatched route.
pub async fn not_found_handler() -> HtmlError {
    HtmlError(AppError::not_found("Page not found", json!({})))
}
