//! Domain layer containing entities, storage contracts and click processing.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Storage trait definitions
//! - [`code_generator`] - Pluggable short code source
//! - [`click_event`] - Click event model
//! - [`click_worker`] - Asynchronous click counting worker
//!
//! # Click Processing Flow
//!
//! 1. Redirect handler resolves the code (expiration is checked here)
//! 2. [`click_event::ClickEvent`] is sent to a bounded channel
//! 3. [`click_worker::run_click_worker`] records it with retry logic
//! 4. The counter is incremented atomically via [`repositories::LinkRepository`]

pub mod click_event;
pub mod click_worker;
pub mod code_generator;
pub mod entities;
pub mod repositories;
