//! Publisher Configuration Module
//!
//! Loads publisher settings from a TOML file with environment-specific
//! overrides and `VV_` prefixed environment variables on top.

use crate::limits;
use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File, Map};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Default location of the base configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/publisher.toml";

/// Top-level publisher configuration
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct PublisherConfig {
    /// Base locator that derived topics are joined onto
    pub base_source_uri: String,

    /// Event-distribution endpoint, when not fetched from a secret provider
    pub endpoint: Option<String>,

    /// Access key for the endpoint, when not fetched from a secret provider
    pub key: Option<String>,

    /// Per-request timeout for the HTTP transport
    pub request_timeout_secs: u64,

    /// Default log level for binaries
    pub log_level: String,

    pub retry: RetrySettings,
    pub batch: BatchSettings,
}

/// Batch retry schedule
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub backoff_multiplier: f64,
    pub max_delay_ms: u64,
}

/// Batch planning ceilings
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BatchSettings {
    pub max_events: usize,
    pub max_bytes: usize,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            base_source_uri: limits::DEFAULT_BASE_SOURCE_URI.to_string(),
            endpoint: None,
            key: None,
            request_timeout_secs: limits::http::REQUEST_TIMEOUT_SECS,
            log_level: "info".to_string(),
            retry: RetrySettings::default(),
            batch: BatchSettings::default(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: limits::retry::MAX_RETRIES,
            base_delay_ms: limits::retry::BASE_DELAY_MS,
            backoff_multiplier: limits::retry::BACKOFF_MULTIPLIER,
            max_delay_ms: limits::retry::MAX_DELAY_MS,
        }
    }
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            max_events: limits::MAX_EVENTS_PER_BATCH,
            max_bytes: limits::MAX_PAYLOAD_SIZE_BYTES,
        }
    }
}

// The access key must never reach the logs.
impl fmt::Debug for PublisherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublisherConfig")
            .field("base_source_uri", &self.base_source_uri)
            .field("endpoint", &self.endpoint)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_level", &self.log_level)
            .field("retry", &self.retry)
            .field("batch", &self.batch)
            .finish()
    }
}

impl RetrySettings {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

impl PublisherConfig {
    /// Load configuration from files with environment overrides
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        Self::load_with_env(base_path, environment, None)
    }

    fn load_with_env(
        base_path: Option<&Path>,
        environment: Option<&str>,
        env_vars: Option<Map<String, String>>,
    ) -> Result<Self> {
        // An explicit path must exist; the default one is optional.
        let (base, required) = match base_path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        let mut builder = Config::builder().add_source(File::from(base).required(required));

        if let Some(env) = environment {
            let env_file = PathBuf::from("config/environments").join(format!("{}.toml", env));

            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        // VV_ENDPOINT, VV_RETRY__MAX_RETRIES, ...
        builder = builder.add_source(
            Environment::with_prefix("VV")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env_vars),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Validate limits, locators and the retry schedule
    pub fn validate(&self) -> Result<()> {
        validate_absolute("base_source_uri", &self.base_source_uri)?;

        if let Some(endpoint) = &self.endpoint {
            validate_absolute("endpoint", endpoint)?;
        }

        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than 0");
        }

        if self.retry.max_retries > limits::retry::MAX_RETRIES_LIMIT {
            bail!(
                "retry.max_retries should not exceed {}",
                limits::retry::MAX_RETRIES_LIMIT
            );
        }

        if self.retry.backoff_multiplier.is_nan() || self.retry.backoff_multiplier < 1.0 {
            bail!("retry.backoff_multiplier must be at least 1.0");
        }

        if self.retry.max_delay_ms < self.retry.base_delay_ms {
            bail!("retry.max_delay_ms must not be below retry.base_delay_ms");
        }

        if self.batch.max_events == 0 || self.batch.max_events > limits::MAX_EVENTS_PER_BATCH {
            bail!(
                "batch.max_events must be between 1 and {}",
                limits::MAX_EVENTS_PER_BATCH
            );
        }

        if self.batch.max_bytes == 0 || self.batch.max_bytes > limits::MAX_PAYLOAD_SIZE_BYTES {
            bail!(
                "batch.max_bytes must be between 1 and {}",
                limits::MAX_PAYLOAD_SIZE_BYTES
            );
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn validate_absolute(field: &str, value: &str) -> Result<()> {
    let url = url::Url::parse(value)
        .with_context(|| format!("{} must be a valid absolute URI: {}", field, value))?;
    if url.cannot_be_a_base() {
        bail!("{} must be a hierarchical absolute URI: {}", field, value);
    }
    Ok(())
}

/// Convenience function to load and validate configuration
pub fn load_config(path: Option<&Path>, environment: Option<&str>) -> Result<PublisherConfig> {
    let config = PublisherConfig::load(path, environment)?;
    config.validate()?;
    Ok(config)
}
