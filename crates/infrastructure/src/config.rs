//! Client configuration.
//!
//! Values are layered, later sources overriding earlier ones:
//! 1. Built-in defaults
//! 2. An optional file named by `ROCKET_CONFIG` (any format `config` reads)
//! 3. `ROCKET_*` environment variables, e.g. `ROCKET_TIMEOUT_MS=5000`

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::persistence::FileCredentialStore;

/// Public tutorial server the client talks to by default.
pub const DEFAULT_ENDPOINT: &str = "https://apollo-fullstack-tutorial.herokuapp.com/graphql";

/// Environment variable naming an optional configuration file.
pub const CONFIG_FILE_VAR: &str = "ROCKET_CONFIG";

const ENV_PREFIX: &str = "ROCKET";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The endpoint is not an absolute http(s) URL.
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// Configured value.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The request timeout is zero.
    #[error("timeout_ms must be greater than zero")]
    InvalidTimeout,
}

/// Settings for the network stack.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Extra attempts for transient query failures.
    pub max_retries: u32,
    /// Base delay between retries in milliseconds.
    pub retry_delay_ms: u64,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Credentials file; the platform data directory when unset.
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: 30_000,
            max_retries: 0,
            retry_delay_ms: 500,
            user_agent: format!("RocketReserver/{}", env!("CARGO_PKG_VERSION")),
            credentials_path: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var_os(CONFIG_FILE_VAR).map(PathBuf::from);
        Self::load_from(file.as_deref(), Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration from an optional file and an environment source.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value is invalid.
    pub fn load_from(file: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("endpoint", defaults.endpoint)?
            .set_default("timeout_ms", defaults.timeout_ms)?
            .set_default("max_retries", u64::from(defaults.max_retries))?
            .set_default("retry_delay_ms", defaults.retry_delay_ms)?
            .set_default("user_agent", defaults.user_agent)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(false));
        }

        let config: Self = builder
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;

        tracing::debug!(
            endpoint = %config.endpoint,
            timeout_ms = config.timeout_ms,
            "configuration loaded"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }

    /// Base delay between retries.
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Credentials file to use: the configured one, else the platform default.
    #[must_use]
    pub fn resolved_credentials_path(&self) -> Option<PathBuf> {
        self.credentials_path
            .clone()
            .or_else(FileCredentialStore::default_path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::load_from(None, env(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_environment_overrides() {
        let config = ClientConfig::load_from(
            None,
            env(&[
                ("ROCKET_ENDPOINT", "http://localhost:4000/graphql"),
                ("ROCKET_TIMEOUT_MS", "5000"),
                ("ROCKET_MAX_RETRIES", "2"),
                ("ROCKET_CREDENTIALS_PATH", "/tmp/creds.json"),
            ]),
        )
        .unwrap();

        assert_eq!(config.endpoint, "http://localhost:4000/graphql");
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(config.max_retries, 2);
        assert_eq!(
            config.resolved_credentials_path(),
            Some(PathBuf::from("/tmp/creds.json"))
        );
    }

    #[test]
    fn test_file_then_environment() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rocket.toml");
        std::fs::write(&path, "timeout_ms = 1000\nretry_delay_ms = 50\n").unwrap();

        let config =
            ClientConfig::load_from(Some(&path), env(&[("ROCKET_TIMEOUT_MS", "2000")])).unwrap();

        assert_eq!(config.timeout_ms, 2000);
        assert_eq!(config.retry_delay(), Duration::from_millis(50));
    }

    #[test]
    fn test_missing_file_is_ignored() {
        let dir = tempdir().unwrap();
        let config =
            ClientConfig::load_from(Some(&dir.path().join("absent.toml")), env(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            ClientConfig::load_from(None, env(&[("ROCKET_ENDPOINT", "ftp://example.com")])),
            Err(ConfigError::InvalidEndpoint { .. })
        ));
        assert!(matches!(
            ClientConfig::load_from(None, env(&[("ROCKET_TIMEOUT_MS", "0")])),
            Err(ConfigError::InvalidTimeout)
        ));
    }
}
