//! HTTP transport boundary
//!
//! The client core never talks HTTP directly. It hands a fully resolved
//! [`TransportRequest`] to a [`Transport`] and gets raw bytes, status and
//! headers back. [`ReqwestTransport`] is the production implementation; its
//! cookie store is shared by every clone and safe for concurrent writers.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::trace;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use url::Url;

use super::auth::BasicAuth;

/// HTTP methods used against the REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// Network-level failure reaching the backend
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("failed to build request: {0}")]
    InvalidRequest(String),
    #[error("failed to read response body: {0}")]
    Body(String),
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

/// One fully resolved HTTP exchange
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: HttpMethod,
    /// Final URL, including auth query parameters when applicable
    pub url: Url,
    pub body: Vec<u8>,
    /// Present when auth travels as an `Authorization` header
    pub basic_auth: Option<BasicAuth>,
}

#[derive(Debug, Clone, Default)]
pub struct TransportResponse {
    pub status: u16,
    /// Header names are stored lowercase
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        self.status == 200 || self.status == 201
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport with a persistent cookie jar
///
/// The backend may pin a client to one origin through cookies after the first
/// exchange, so every request made through this transport shares one jar.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .user_agent(concat!("woo-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        trace!("{} {}", request.method, request.url.path());

        let mut builder = self
            .client
            .request(request.method.into(), request.url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(auth) = request.basic_auth {
            builder = builder.basic_auth(auth.username, Some(auth.password));
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_ascii_lowercase(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("x-wp-total".to_string(), "42".to_string());
        let response = TransportResponse {
            status: 200,
            headers,
            body: Vec::new(),
        };

        assert_eq!(response.header("X-WP-Total"), Some("42"));
        assert_eq!(response.header("X-WP-TotalPages"), None);
    }

    #[test]
    fn test_success_statuses() {
        let mut response = TransportResponse::default();
        for (status, expected) in [(200, true), (201, true), (204, false), (400, false), (500, false)] {
            response.status = status;
            assert_eq!(response.is_success(), expected, "status {}", status);
        }
    }

    #[test]
    fn test_method_names() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
        assert_eq!(reqwest::Method::from(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(reqwest::Method::from(HttpMethod::Post), reqwest::Method::POST);
    }
}
