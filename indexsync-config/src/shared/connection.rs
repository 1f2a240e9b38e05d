use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::shared::ValidationError;

/// Connection settings for the search service hosting the source and
/// destination indices.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConnectionConfig {
    /// Application identifier issued by the search service.
    pub app_id: String,
    /// Admin API key with browse and write permissions.
    pub api_key: SecretString,
    /// Optional endpoint override routing all requests to a single base URL.
    ///
    /// When `None`, the service's standard per-application hosts are used.
    /// Mainly useful for tests and self-hosted deployments.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Per-request timeout in seconds. A request exceeding this is a fatal
    /// fetch/publish error.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SearchConnectionConfig {
    /// Default per-request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Validates connection settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.app_id.is_empty() {
            return Err(ValidationError::AppIdEmpty);
        }

        if self.api_key.expose_secret().is_empty() {
            return Err(ValidationError::ApiKeyEmpty);
        }

        if self.timeout_secs == 0 {
            return Err(ValidationError::TimeoutZero);
        }

        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    SearchConnectionConfig::DEFAULT_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection(app_id: &str, api_key: &str) -> SearchConnectionConfig {
        SearchConnectionConfig {
            app_id: app_id.to_string(),
            api_key: api_key.to_string().into(),
            endpoint: None,
            timeout_secs: SearchConnectionConfig::DEFAULT_TIMEOUT_SECS,
        }
    }

    #[test]
    fn complete_connection_is_valid() {
        assert!(connection("APP123", "secret").validate().is_ok());
    }

    #[test]
    fn empty_credentials_are_rejected() {
        assert!(matches!(
            connection("", "secret").validate(),
            Err(ValidationError::AppIdEmpty)
        ));
        assert!(matches!(
            connection("APP123", "").validate(),
            Err(ValidationError::ApiKeyEmpty)
        ));
    }

    #[test]
    fn timeout_defaults_when_omitted() {
        let config: SearchConnectionConfig = serde_json::from_value(serde_json::json!({
            "app_id": "APP123",
            "api_key": "secret",
        }))
        .unwrap();

        assert_eq!(config.timeout_secs, 30);
        assert!(config.endpoint.is_none());
    }
}
