//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for link persistence.
//!
//! # Modules
//!
//! - [`persistence`] - File and in-memory link stores

pub mod persistence;
