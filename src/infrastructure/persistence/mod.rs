//! Link store implementations.
//!
//! Concrete implementations of the [`LinkStore`](crate::domain::repositories::LinkStore)
//! port.
//!
//! # Stores
//!
//! - [`JsonFileStore`] - Durable JSON state file with atomic replacement
//! - [`InMemoryStore`] - Process-local store for tests and throwaway runs

pub mod json_file_store;
pub mod memory_store;

pub use json_file_store::JsonFileStore;
pub use memory_store::InMemoryStore;
