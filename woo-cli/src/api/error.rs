//! Error taxonomy for the WooCommerce client
//!
//! Request-level failures are attributed to the queue slot that produced them.
//! Only configuration problems and strict-mode dispatch failures abort a call.

use thiserror::Error;

use super::queue::QueueOutcome;
use super::transport::TransportError;

pub type Result<T, E = WooError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum WooError {
    /// Operation attempted before initialization, or an invalid tuning parameter
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Backend reachable but answered with something other than 200/201
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The total-count header was missing or malformed
    #[error("item count unavailable for {endpoint}: {reason}")]
    CountUnavailable { endpoint: String, reason: String },

    /// A single request failed on every attempt it was allowed
    #[error("request to {endpoint} failed after {attempts} attempt(s): {last_error}")]
    RequestExhausted {
        endpoint: String,
        attempts: u32,
        #[source]
        last_error: Box<WooError>,
    },

    #[error("failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request contents violate the backend contract (e.g. create item carrying an id)
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("dispatch worker terminated unexpectedly: {0}")]
    WorkerFailed(String),

    /// Strict dispatch saw at least one failed slot; `partial` holds everything collected
    #[error("{failed} of {total} request(s) failed; first failure at position {index}: {message}")]
    DispatchFailed {
        index: usize,
        message: String,
        failed: usize,
        total: usize,
        partial: Box<QueueOutcome>,
    },
}

impl WooError {
    pub(crate) fn not_initialized() -> Self {
        Self::Configuration(
            "connection is not initialized; call Connection::init with your credentials first"
                .to_string(),
        )
    }

    /// HTTP status carried by this error, looking through retry exhaustion
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::RequestExhausted { last_error, .. } => last_error.status(),
            _ => None,
        }
    }

    /// Whether another attempt could reasonably succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::HttpStatus { status, .. } => {
                *status >= 500 || *status == 408 || *status == 429
            }
            _ => false,
        }
    }
}
