//! Store credentials and authentication placement

use std::fmt;

use url::Url;

use super::error::{Result, WooError};

/// REST API credentials for a single store
///
/// Immutable once built. The domain is the store's base URL; key and secret are
/// the consumer key pair generated in the WooCommerce admin.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    domain: String,
    key: String,
    secret: String,
}

impl Credentials {
    pub fn new(
        domain: impl Into<String>,
        key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self> {
        let domain = domain.into().trim().trim_end_matches('/').to_string();
        let key = key.into().trim().to_string();
        let secret = secret.into().trim().to_string();

        if domain.is_empty() {
            return Err(WooError::Configuration("store domain must not be empty".into()));
        }
        if key.is_empty() {
            return Err(WooError::Configuration("consumer key must not be empty".into()));
        }
        if secret.is_empty() {
            return Err(WooError::Configuration("consumer secret must not be empty".into()));
        }

        Ok(Self {
            domain,
            key,
            secret,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("domain", &self.domain)
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Where the consumer key pair travels on a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `consumer_key` / `consumer_secret` query parameters (secure URLs only)
    QueryParameters,
    /// HTTP Basic `Authorization` header
    BasicHeader,
}

impl AuthScheme {
    pub fn for_url(url: &Url) -> Self {
        if url.scheme() == "https" {
            Self::QueryParameters
        } else {
            Self::BasicHeader
        }
    }
}

/// Username/password pair handed to the transport for header auth
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
