//! WooCommerce request operations
//!
//! This module provides the request variants the dispatcher executes and the
//! batch planner that groups create/update/delete work into `/batch` calls.

pub mod batch;
pub mod request;

pub use batch::{plan_creates, plan_deletes, plan_updates};
pub use request::{BatchPost, Payload, Request};
