//! Core domain entities.
//!
//! The service has a single entity, [`LinkEntry`]: a short id bound to the
//! original URL it redirects to, with its creation time.

pub mod link;

pub use link::LinkEntry;
