//! Command-line configuration
//!
//! Settings come from a TOML file (default `~/.config/woo-cli/config.toml`)
//! and are then overlaid with environment variables:
//!
//! - `WOO_DOMAIN`, `WOO_KEY`, `WOO_SECRET`: store credentials
//! - `WOO_MAX_RETRIES`: attempts per request
//! - `WOO_BATCH_SIZE`: operations per batch request
//! - `WOO_MAX_CONCURRENT`: requests in flight at once
//!
//! A `.env` file in the working directory is loaded by the binary before the
//! overlay is applied.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use serde::Deserialize;

use crate::api::{Credentials, ResilienceConfig};

pub const ENV_DOMAIN: &str = "WOO_DOMAIN";
pub const ENV_KEY: &str = "WOO_KEY";
pub const ENV_SECRET: &str = "WOO_SECRET";
pub const ENV_MAX_RETRIES: &str = "WOO_MAX_RETRIES";
pub const ENV_BATCH_SIZE: &str = "WOO_BATCH_SIZE";
pub const ENV_MAX_CONCURRENT: &str = "WOO_MAX_CONCURRENT";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub tuning: TuningConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub domain: Option<String>,
    pub key: Option<String>,
    pub secret: Option<String>,
}

/// Optional overrides; unset values keep the library defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub max_retries: Option<u32>,
    pub batch_size: Option<usize>,
    pub max_concurrent_requests: Option<usize>,
    pub page_size: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

/// `~/.config/woo-cli/config.toml`
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("woo-cli")
        .join("config.toml")
}

impl Config {
    /// Load the file (if any) and apply the process environment on top
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = default_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    debug!("No config file at {}; using environment only", path.display());
                    Self::default()
                }
            }
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid TOML format")
    }

    /// Overlay values from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(domain) = lookup(ENV_DOMAIN) {
            self.store.domain = Some(domain);
        }
        if let Some(key) = lookup(ENV_KEY) {
            self.store.key = Some(key);
        }
        if let Some(secret) = lookup(ENV_SECRET) {
            self.store.secret = Some(secret);
        }
        if let Some(value) = parse_env(&lookup, ENV_MAX_RETRIES)? {
            self.tuning.max_retries = Some(value);
        }
        if let Some(value) = parse_env(&lookup, ENV_BATCH_SIZE)? {
            self.tuning.batch_size = Some(value);
        }
        if let Some(value) = parse_env(&lookup, ENV_MAX_CONCURRENT)? {
            self.tuning.max_concurrent_requests = Some(value);
        }
        Ok(())
    }

    pub fn credentials(&self) -> Result<Credentials> {
        let domain = required(&self.store.domain, "domain", ENV_DOMAIN)?;
        let key = required(&self.store.key, "key", ENV_KEY)?;
        let secret = required(&self.store.secret, "secret", ENV_SECRET)?;
        Ok(Credentials::new(domain, key, secret)?)
    }

    pub fn resilience(&self) -> Result<ResilienceConfig> {
        let mut builder = ResilienceConfig::builder();
        let tuning = &self.tuning;
        if let Some(attempts) = tuning.max_retries {
            builder = builder.max_retries(attempts);
        }
        if let Some(size) = tuning.batch_size {
            builder = builder.batch_stride_size(size);
        }
        if let Some(max) = tuning.max_concurrent_requests {
            builder = builder.max_concurrent_requests(max);
        }
        if let Some(size) = tuning.page_size {
            builder = builder.page_size(size);
        }
        if let Some(secs) = tuning.request_timeout_secs {
            builder = builder.request_timeout(std::time::Duration::from_secs(secs));
        }

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }
}

fn required<'a>(value: &'a Option<String>, field: &str, env: &str) -> Result<&'a str> {
    value.as_deref().ok_or_else(|| {
        anyhow!(
            "Missing store {}: set [store].{} in the config file or {}",
            field,
            field,
            env
        )
    })
}

fn parse_env<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Invalid value for {}: '{}'", name, raw))
        })
        .transpose()
}
