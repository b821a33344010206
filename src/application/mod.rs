//! Application layer services implementing business logic.
//!
//! The registry orchestrates the storage port and the id generator and owns
//! every invariant of the link set. HTTP handlers and the admin CLI consume
//! it through a shared `Arc`.
//!
//! # Available Services
//!
//! - [`services::link_registry::LinkRegistry`] - Short link creation and resolution

pub mod services;
