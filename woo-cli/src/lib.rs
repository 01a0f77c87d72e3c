//! Bulk client for the WooCommerce REST API
//!
//! The [`api`] module is usable on its own; [`cli`] and [`config`] back the
//! `woo-cli` binary.

pub mod api;
pub mod cli;
pub mod config;
