//! Application layer services implementing the core engine.
//!
//! Services consume repository traits and expose the operations the HTTP layer
//! and the admin CLI call into.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short code assignment (`assign`)
//! - [`services::redirect_service::RedirectService`] - `resolve`, `record_click`,
//!   `stats` and `remove`

pub mod services;
