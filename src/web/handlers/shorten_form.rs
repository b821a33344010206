//! Form submission handler for link creation.

use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use url::form_urlencoded;

use crate::domain::errors::RegistryError;
use crate::state::AppState;
use crate::utils::short_link::{request_origin, short_url};
use crate::web::error::HtmlError;
use crate::web::handlers::home::HomeTemplate;

#[derive(Debug, Deserialize)]
pub struct ShortenForm {
    #[serde(default)]
    pub url: String,
}

/// Creates a short link from the home page form.
///
/// # Endpoint
///
/// `POST /shortenLink` (form field `url`)
///
/// On success redirects (`303 See Other`) to `/accueil?link=<short link>`,
/// so reloading the result page does not resubmit the form.
///
/// # Errors
///
/// An empty URL re-renders the home page with status 400.
/// A storage failure renders the 500 error page.
pub async fn shorten_form_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ShortenForm>,
) -> Result<Response, HtmlError> {
    let code = match state.registry.create(&form.url).await {
        Ok(code) => code,
        Err(RegistryError::InvalidInput(_)) => {
            let page = HomeTemplate::build(
                &state,
                &headers,
                None,
                Some("Please enter a URL to shorten.".to_string()),
            )
            .await;
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let origin = request_origin(&headers, &state.public_base_url);
    let link: String =
        form_urlencoded::byte_serialize(short_url(&origin, &code).as_bytes()).collect();

    Ok(Redirect::to(&format!("/accueil?link={link}")).into_response())
}
