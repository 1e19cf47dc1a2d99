//! Domain layer containing business entities and the click pipeline.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Storage and identity trait definitions
//! - [`click_event`] - Click recording request model
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. The redirect path resolves a code and answers immediately
//! 2. A [`click_event::ClickEvent`] is offered to a bounded channel (dropped if full)
//! 3. [`click_worker::run_click_worker`] applies it via [`repositories::LinkRepository::record_click`]
//! 4. The outcome is logged; it never reaches the client

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
