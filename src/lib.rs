//! # linkstash
//!
//! A small single-process URL shortener built with Axum, keeping its links in
//! a durable JSON file.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - The link entity, the storage port and errors
//! - **Application Layer** ([`application`]) - The short-link registry
//! - **Infrastructure Layer** ([`infrastructure`]) - File and in-memory stores
//! - **API Layer** ([`api`]) - JSON handlers, DTOs and middleware
//! - **Web Layer** ([`web`]) - HTML pages and the redirect endpoint
//!
//! ## Guarantees
//!
//! - Every URL maps to one short id; submitting it again returns the same id
//! - A create returns only after the full link set has been written to disk
//! - Concurrent creates are serialized; readers never see a half-applied one
//!
//! ## Quick Start
//!
//! ```bash
//! export LINKS_FILE="links.json"
//! export PUBLIC_BASE_URL="http://localhost:8080"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod logging;
pub mod server;

pub mod routes;
pub mod web;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkRegistry, RegistryOptions, Shortened};
    pub use crate::domain::entities::LinkEntry;
    pub use crate::domain::errors::{RegistryError, StoreError};
    pub use crate::domain::repositories::LinkStore;
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::{InMemoryStore, JsonFileStore};
    pub use crate::state::AppState;
}
