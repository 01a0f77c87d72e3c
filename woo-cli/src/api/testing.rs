//! In-memory transport and client fixtures for unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::auth::Credentials;
use super::client::WooClient;
use super::resilience::{ResilienceConfig, RetryConfig};
use super::transport::{HttpMethod, Transport, TransportError, TransportRequest, TransportResponse};

type Handler =
    dyn Fn(&TransportRequest, usize) -> Result<TransportResponse, TransportError> + Send + Sync;
type DelayFn = dyn Fn(&TransportRequest) -> Duration + Send + Sync;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub url: Url,
    /// Path plus query, without scheme and host
    pub target: String,
    pub body: Vec<u8>,
}

/// Transport answering from a closure
///
/// The handler receives the request and how many times this exact target
/// (path plus query) has been requested so far, starting at 1.
pub struct ScriptedTransport {
    handler: Box<Handler>,
    delay: Option<Box<DelayFn>>,
    calls: Mutex<Vec<RecordedCall>>,
    hits: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new<H>(handler: H) -> Arc<Self>
    where
        H: Fn(&TransportRequest, usize) -> Result<TransportResponse, TransportError>
            + Send
            + Sync
            + 'static,
    {
        Arc::new(Self::build(Box::new(handler), None))
    }

    pub fn with_delay<H, D>(handler: H, delay: D) -> Arc<Self>
    where
        H: Fn(&TransportRequest, usize) -> Result<TransportResponse, TransportError>
            + Send
            + Sync
            + 'static,
        D: Fn(&TransportRequest) -> Duration + Send + Sync + 'static,
    {
        Arc::new(Self::build(Box::new(handler), Some(Box::new(delay))))
    }

    fn build(handler: Box<Handler>, delay: Option<Box<DelayFn>>) -> Self {
        Self {
            handler,
            delay,
            calls: Mutex::new(Vec::new()),
            hits: Mutex::new(HashMap::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

pub fn target_of(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let target = target_of(&request.url);
        let hit = {
            let mut hits = self.hits.lock().unwrap();
            let counter = hits.entry(target.clone()).or_insert(0);
            *counter += 1;
            *counter
        };
        self.calls.lock().unwrap().push(RecordedCall {
            method: request.method,
            url: request.url.clone(),
            target,
            body: request.body.clone(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = &self.delay {
            let wait = delay(&request);
            if !wait.is_zero() {
                tokio::time::sleep(wait).await;
            }
        } else {
            tokio::task::yield_now().await;
        }

        let result = (self.handler)(&request, hit);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub fn status(code: u16, body: &[u8]) -> Result<TransportResponse, TransportError> {
    Ok(TransportResponse {
        status: code,
        headers: HashMap::new(),
        body: body.to_vec(),
    })
}

pub fn ok(body: &[u8]) -> Result<TransportResponse, TransportError> {
    status(200, body)
}

pub fn ok_with_total(body: &[u8], total: &str) -> Result<TransportResponse, TransportError> {
    let mut headers = HashMap::new();
    headers.insert("x-wp-total".to_string(), total.to_string());
    Ok(TransportResponse {
        status: 200,
        headers,
        body: body.to_vec(),
    })
}

pub fn test_config() -> ResilienceConfig {
    ResilienceConfig::builder()
        .retry_config(RetryConfig::immediate(3))
        .max_concurrent_requests(4)
        .batch_stride_size(16)
        .build()
}

pub fn test_client_for(domain: &str, transport: Arc<ScriptedTransport>) -> Arc<WooClient> {
    test_client_with(domain, test_config(), transport)
}

pub fn test_client_with(
    domain: &str,
    config: ResilienceConfig,
    transport: Arc<ScriptedTransport>,
) -> Arc<WooClient> {
    let credentials = Credentials::new(domain, "ck_test", "cs_test").unwrap();
    Arc::new(WooClient::new(credentials, config, transport).unwrap())
}

pub fn test_client(transport: Arc<ScriptedTransport>) -> Arc<WooClient> {
    test_client_for("http://shop.test", transport)
}
