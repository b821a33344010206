//! Storage port definitions for the domain layer.
//!
//! The registry depends only on the [`LinkStore`] trait; concrete backends
//! live in `crate::infrastructure::persistence`, so the same registry logic
//! can target a flat file or an in-memory set without change.
//!
//! Mock implementations are generated via `mockall` for unit tests.

pub mod link_store;

pub use link_store::LinkStore;

#[cfg(test)]
pub use link_store::MockLinkStore;
