//! WooCommerce REST API client
//!
//! Layers, bottom to top: the [`transport`] boundary and [`client`] request
//! primitive, the [`operations`] a queue can hold, the [`query`] and batch
//! planners that produce them, the [`queue`] dispatcher that runs them with
//! bounded concurrency, and the stateful [`connection`] tying it together.

pub mod auth;
pub mod client;
pub mod connection;
pub mod constants;
pub mod error;
pub mod models;
pub mod operations;
pub mod progress;
pub mod query;
pub mod queue;
pub mod resilience;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AuthScheme, Credentials};
pub use client::WooClient;
pub use connection::Connection;
pub use error::{Result, WooError};
pub use models::{Attribute, Category, Product, WooItem};
pub use operations::{BatchPost, Payload, Request};
pub use progress::ProgressBar;
pub use query::{PagePlan, PageQuery, PageStyle};
pub use queue::{DispatchOptions, QueueExecutor, QueueOutcome};
pub use resilience::{ResilienceConfig, RetryConfig, RetryMode, RetryPolicy};
pub use transport::{HttpMethod, ReqwestTransport, Transport, TransportError};
