//! Utility functions for id generation and request handling.
//!
//! - [`code_generator`] - Short id generation
//! - [`short_link`] - Short link construction from request headers

pub mod code_generator;
pub mod short_link;
