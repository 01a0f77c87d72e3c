//! Core Request types sent through the dispatcher

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value, json};
use tokio_util::sync::CancellationToken;

use crate::api::client::WooClient;
use crate::api::error::{Result, WooError};
use crate::api::models::WooItem;
use crate::api::resilience::RetryPolicy;
use crate::api::transport::HttpMethod;

/// Item that can travel as a request body
///
/// Blanket-implemented for every serializable [`WooItem`], so products,
/// categories, attributes and caller-defined types all qualify.
pub trait Payload: WooItem + fmt::Debug + Send + Sync {
    fn to_value(&self) -> std::result::Result<Value, serde_json::Error>;
}

impl<T> Payload for T
where
    T: WooItem + Serialize + fmt::Debug + Send + Sync,
{
    fn to_value(&self) -> std::result::Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Grouped create/update/delete call against a `/batch` endpoint
#[derive(Debug, Clone, Default)]
pub struct BatchPost {
    pub endpoint: String,
    /// Must not carry ids; the backend assigns them
    pub create: Vec<Arc<dyn Payload>>,
    /// Must carry ids
    pub update: Vec<Arc<dyn Payload>>,
    pub delete: Vec<u64>,
}

impl BatchPost {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Number of operations carried by this batch
    pub fn len(&self) -> usize {
        self.create.len() + self.update.len() + self.delete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(pos) = self.create.iter().position(|item| item.id().is_some()) {
            return Err(WooError::Validation(format!(
                "create item {} on {} carries an id; the backend assigns ids",
                pos, self.endpoint
            )));
        }
        if let Some(pos) = self.update.iter().position(|item| item.id().is_none()) {
            return Err(WooError::Validation(format!(
                "update item {} on {} has no id",
                pos, self.endpoint
            )));
        }
        Ok(())
    }

    /// The `{create, update, delete}` envelope, empty lists omitted
    pub fn envelope(&self) -> Result<Value> {
        let mut envelope = Map::new();
        if !self.create.is_empty() {
            let items = self
                .create
                .iter()
                .map(|item| item.to_value())
                .collect::<std::result::Result<Vec<_>, _>>()?;
            envelope.insert("create".to_string(), Value::Array(items));
        }
        if !self.update.is_empty() {
            let items = self
                .update
                .iter()
                .map(|item| item.to_value())
                .collect::<std::result::Result<Vec<_>, _>>()?;
            envelope.insert("update".to_string(), Value::Array(items));
        }
        if !self.delete.is_empty() {
            envelope.insert("delete".to_string(), json!(self.delete));
        }
        Ok(Value::Object(envelope))
    }
}

/// A single unit of work for the dispatcher
///
/// Requests are immutable once built; sending one never changes the client.
#[derive(Debug, Clone)]
pub enum Request {
    Get {
        endpoint: String,
    },
    Post {
        endpoint: String,
        payload: Arc<dyn Payload>,
    },
    BatchPost(BatchPost),
}

impl Request {
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::Get {
            endpoint: endpoint.into(),
        }
    }

    pub fn post<T: Payload + 'static>(endpoint: impl Into<String>, payload: T) -> Self {
        Self::Post {
            endpoint: endpoint.into(),
            payload: Arc::new(payload),
        }
    }

    pub fn batch(batch: BatchPost) -> Self {
        Self::BatchPost(batch)
    }

    pub fn endpoint(&self) -> &str {
        match self {
            Self::Get { endpoint } => endpoint,
            Self::Post { endpoint, .. } => endpoint,
            Self::BatchPost(batch) => &batch.endpoint,
        }
    }

    pub fn http_method(&self) -> HttpMethod {
        match self {
            Self::Get { .. } => HttpMethod::Get,
            Self::Post { .. } | Self::BatchPost(_) => HttpMethod::Post,
        }
    }

    pub fn operation_type(&self) -> &'static str {
        match self {
            Self::Get { .. } => "get",
            Self::Post { .. } => "post",
            Self::BatchPost(_) => "batch_post",
        }
    }

    /// Encode the request body; failures here are never retried
    pub fn body(&self) -> Result<Vec<u8>> {
        match self {
            Self::Get { .. } => Ok(Vec::new()),
            Self::Post { payload, .. } => Ok(serde_json::to_vec(&payload.to_value()?)?),
            Self::BatchPost(batch) => {
                batch.validate()?;
                Ok(serde_json::to_vec(&batch.envelope()?)?)
            }
        }
    }

    /// JSON description of the request as it would be sent
    pub fn describe(&self) -> Result<Value> {
        let body = match self {
            Self::Get { .. } => Value::Null,
            Self::Post { payload, .. } => payload.to_value()?,
            Self::BatchPost(batch) => {
                batch.validate()?;
                batch.envelope()?
            }
        };
        Ok(json!({
            "method": self.http_method().as_str(),
            "endpoint": self.endpoint(),
            "body": body,
        }))
    }

    /// Send through the client with the client's retry policy
    pub async fn send(&self, client: &WooClient) -> Result<Vec<u8>> {
        self.send_with(client, None).await
    }

    /// Like [`Request::send`], observing a cancellation token between attempts
    pub async fn send_with(
        &self,
        client: &WooClient,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<u8>> {
        let body = self.body()?;
        let body = body.as_slice();
        let method = self.http_method();
        let endpoint = self.endpoint();

        let policy = RetryPolicy::new(client.config().retry.clone());
        policy
            .execute(endpoint, cancel, move || client.execute(method, endpoint, body))
            .await
    }
}

impl From<BatchPost> for Request {
    fn from(batch: BatchPost) -> Self {
        Self::BatchPost(batch)
    }
}
