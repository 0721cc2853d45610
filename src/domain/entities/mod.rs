//! Core domain entities.
//!
//! - [`Link`] - A stored short code to URL mapping
//! - [`NewLink`] - Input for creating a link
//! - [`LinkStats`] - Read view returned by the stats operation

pub mod link;

pub use link::{Link, LinkStats, NewLink};
