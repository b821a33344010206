//! Home page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
};
use chrono::Local;
use serde::Deserialize;

use crate::domain::entities::LinkEntry;
use crate::state::AppState;
use crate::utils::short_link::{request_origin, short_url};

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    /// Short link created by the previous form submission.
    pub link: Option<String>,
}

/// One row of the link table.
pub struct LinkRow {
    pub code: String,
    pub short_url: String,
    pub long_url: String,
    pub created_at: String,
}

/// Template for the home page.
///
/// Renders `templates/home.html` with:
/// - Link creation form
/// - The link just created, with a copy button
/// - Every registered link, newest last
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub link: Option<String>,
    pub error: Option<String>,
    pub count: usize,
    pub links: Vec<LinkRow>,
}

impl HomeTemplate {
    /// Builds the page from the current registry contents.
    pub async fn build(
        state: &AppState,
        headers: &HeaderMap,
        link: Option<String>,
        error: Option<String>,
    ) -> Self {
        let origin = request_origin(headers, &state.public_base_url);
        let links: Vec<LinkRow> = state
            .registry
            .list_all()
            .await
            .into_iter()
            .map(|entry| LinkRow::new(&origin, entry))
            .collect();

        Self {
            link: link.filter(|l| !l.is_empty()),
            error,
            count: links.len(),
            links,
        }
    }
}

impl LinkRow {
    fn new(origin: &str, entry: LinkEntry) -> Self {
        Self {
            short_url: short_url(origin, &entry.short_id),
            created_at: entry
                .created_at
                .with_timezone(&Local)
                .format("%d/%m/%Y %H:%M:%S")
                .to_string(),
            code: entry.short_id,
            long_url: entry.original_url,
        }
    }
}

/// Renders the home page.
///
/// # Endpoint
///
/// `GET /accueil?link=<short link>`
pub async fn home_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HomeQuery>,
) -> HomeTemplate {
    HomeTemplate::build(&state, &headers, query.link, None).await
}
