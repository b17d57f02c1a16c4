//! Endpoint and credential providers
//!
//! The publisher reads its endpoint and access key once, at construction.

use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub const ENDPOINT_ENV_VAR: &str = "VV_EVENT_ENDPOINT";
pub const KEY_ENV_VAR: &str = "VV_EVENT_KEY";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SecretError {
    #[error("Secret '{0}' not found")]
    NotFound(String),

    #[error("Secret store unavailable: {0}")]
    Unavailable(String),
}

/// Source of the event endpoint and its access key
#[async_trait]
pub trait SecretProvider: Send + Sync + Debug {
    async fn event_endpoint(&self) -> Result<String, SecretError>;

    async fn event_key(&self) -> Result<String, SecretError>;
}

/// Reads secrets from `VV_EVENT_ENDPOINT` and `VV_EVENT_KEY`
#[derive(Debug, Clone, Default)]
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    fn read(name: &str) -> Result<String, SecretError> {
        std::env::var(name).map_err(|_| SecretError::NotFound(name.to_string()))
    }
}

#[async_trait]
impl SecretProvider for EnvSecretProvider {
    async fn event_endpoint(&self) -> Result<String, SecretError> {
        Self::read(ENDPOINT_ENV_VAR)
    }

    async fn event_key(&self) -> Result<String, SecretError> {
        Self::read(KEY_ENV_VAR)
    }
}

/// Fixed secrets, typically taken from the config file
#[derive(Clone)]
pub struct StaticSecretProvider {
    endpoint: String,
    key: String,
}

impl StaticSecretProvider {
    pub fn new(endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            key: key.into(),
        }
    }
}

impl Debug for StaticSecretProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticSecretProvider")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SecretProvider for StaticSecretProvider {
    async fn event_endpoint(&self) -> Result<String, SecretError> {
        Ok(self.endpoint.clone())
    }

    async fn event_key(&self) -> Result<String, SecretError> {
        Ok(self.key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticSecretProvider::new("https://topic.example/api/events", "k3y");
        assert_eq!(
            provider.event_endpoint().await.unwrap(),
            "https://topic.example/api/events"
        );
        assert_eq!(provider.event_key().await.unwrap(), "k3y");
        assert!(!format!("{:?}", provider).contains("k3y"));
    }

    #[tokio::test]
    async fn test_env_provider_missing_variable() {
        let err = EnvSecretProvider::read("VV_EVENT_TEST_UNSET_VARIABLE").unwrap_err();
        assert_eq!(
            err,
            SecretError::NotFound("VV_EVENT_TEST_UNSET_VARIABLE".to_string())
        );
    }
}
