//! Core domain entities.
//!
//! - [`Link`] - A shortened URL mapping with its click counters
//! - [`NewLink`] - Input for creating a link

pub mod link;

pub use link::{Link, NewLink};
