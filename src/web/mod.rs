//! Web layer for the browser UI.
//!
//! Server-side rendered pages using Askama templates.
//!
//! # Modules
//!
//! - [`error`] - HTML error pages and the 404 fallback
//! - [`handlers`] - Page and form handlers
//! - [`routes`] - Browser route configuration

pub mod error;
pub mod handlers;
pub mod routes;
