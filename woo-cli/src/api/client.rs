//! Shared request primitive for the WooCommerce REST API
//!
//! [`WooClient`] owns the credentials, the transport and the tuning
//! parameters. It is shared read-only (behind an `Arc`) by every dispatcher
//! worker; the only mutable state it touches is the transport's cookie store.

use std::fmt;
use std::sync::Arc;

use log::debug;
use url::Url;

use super::auth::{AuthScheme, BasicAuth, Credentials};
use super::constants::TOTAL_COUNT_HEADER;
use super::error::{Result, WooError};
use super::resilience::ResilienceConfig;
use super::transport::{HttpMethod, Transport, TransportRequest, TransportResponse};

pub struct WooClient {
    credentials: Credentials,
    config: ResilienceConfig,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for WooClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WooClient")
            .field("credentials", &self.credentials)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl WooClient {
    pub fn new(
        credentials: Credentials,
        config: ResilienceConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            credentials,
            config,
            transport,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn config(&self) -> &ResilienceConfig {
        &self.config
    }

    /// Resolve an endpoint against the store domain
    ///
    /// Secure URLs carry the consumer key pair as query parameters; plain
    /// HTTP URLs get header-based basic auth instead.
    pub fn build_link(&self, endpoint: &str) -> Result<(Url, AuthScheme)> {
        let raw = if endpoint.starts_with('/') {
            format!("{}{}", self.credentials.domain(), endpoint)
        } else {
            format!("{}/{}", self.credentials.domain(), endpoint)
        };

        let mut url = Url::parse(&raw)
            .map_err(|e| WooError::Configuration(format!("invalid URL '{}': {}", raw, e)))?;

        let scheme = AuthScheme::for_url(&url);
        if scheme == AuthScheme::QueryParameters {
            url.query_pairs_mut()
                .append_pair("consumer_key", self.credentials.key())
                .append_pair("consumer_secret", self.credentials.secret());
        }

        Ok((url, scheme))
    }

    pub fn build_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &[u8],
    ) -> Result<TransportRequest> {
        let (url, scheme) = self.build_link(endpoint)?;
        let basic_auth = match scheme {
            AuthScheme::BasicHeader => Some(BasicAuth {
                username: self.credentials.key().to_string(),
                password: self.credentials.secret().to_string(),
            }),
            AuthScheme::QueryParameters => None,
        };

        Ok(TransportRequest {
            method,
            url,
            body: body.to_vec(),
            basic_auth,
        })
    }

    async fn exchange(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &[u8],
    ) -> Result<TransportResponse> {
        let request = self.build_request(method, endpoint, body)?;
        debug!("{} {}", method, endpoint);

        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            return Err(WooError::HttpStatus {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }
        Ok(response)
    }

    /// Perform one HTTP exchange and return the raw response body
    pub async fn execute(&self, method: HttpMethod, endpoint: &str, body: &[u8]) -> Result<Vec<u8>> {
        self.exchange(method, endpoint, body)
            .await
            .map(|response| response.body)
    }

    /// Read the total item count of a collection from its count header
    ///
    /// The endpoint should already restrict the page to one item.
    pub async fn count_items(&self, endpoint: &str) -> Result<u64> {
        let response = self.exchange(HttpMethod::Get, endpoint, &[]).await?;

        let raw = response
            .header(TOTAL_COUNT_HEADER)
            .ok_or_else(|| WooError::CountUnavailable {
                endpoint: endpoint.to_string(),
                reason: format!("response has no {} header", TOTAL_COUNT_HEADER),
            })?;

        let total = raw
            .trim()
            .parse::<u64>()
            .map_err(|e| WooError::CountUnavailable {
                endpoint: endpoint.to_string(),
                reason: format!("{} header '{}' is not a number: {}", TOTAL_COUNT_HEADER, raw, e),
            })?;

        debug!("{} reports {} item(s)", endpoint, total);
        Ok(total)
    }
}
