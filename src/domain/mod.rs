//! Domain layer containing the link entity, its storage port and errors.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Storage port trait definitions
//! - [`errors`] - Registry and storage error taxonomy
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. The registry itself lives in [`crate::application::services`].

pub mod entities;
pub mod errors;
pub mod repositories;
