//! Browser-facing route configuration.

use crate::state::AppState;
use crate::web::handlers::{home_handler, redirect_handler, shorten_form_handler};
use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

/// Public browser routes.
///
/// # Endpoints
///
/// - `GET  /`            - Redirect to the home page
/// - `GET  /accueil`     - Home page with creation form and link list
/// - `POST /shortenLink` - Form submission
/// - `GET  /{code}`      - Short link redirect
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/accueil") }))
        .route("/accueil", get(home_handler))
        .route("/shortenLink", post(shorten_form_handler))
        .route("/{code}", get(redirect_handler))
}
