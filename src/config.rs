//! Configuration management for Biblio.
//!
//! Settings come from an optional YAML file layered under environment
//! variables prefixed with `BIBLIO__` (e.g. `BIBLIO__RATE_LIMITING__CAPACITY=5`).

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{BiblioError, Result};
use crate::ratelimit::RateLimitPolicy;

/// Environment variable prefix for configuration overrides.
const ENV_PREFIX: &str = "BIBLIO";

/// Main configuration for the Biblio service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BiblioConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limiting: RateLimitingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen address
    #[serde(default = "default_http_addr")]
    pub http_addr: SocketAddr,

    /// How often the book stream polls the store, in milliseconds
    #[serde(default = "default_stream_poll_interval")]
    pub stream_poll_interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            stream_poll_interval_ms: default_stream_poll_interval(),
        }
    }
}

fn default_http_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

fn default_stream_poll_interval() -> u64 {
    2000
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret expected as `Authorization: Bearer <token>`
    #[serde(default = "default_token")]
    pub token: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: default_token(),
        }
    }
}

fn default_token() -> String {
    "mysecrettoken".to_string()
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitingConfig {
    /// Requests admitted per window and caller
    #[serde(default = "default_capacity")]
    pub capacity: u64,

    /// Sliding window width in seconds
    #[serde(default = "default_window")]
    pub window_secs: u64,

    /// How often idle caller windows are evicted, in seconds
    #[serde(default = "default_eviction_interval")]
    pub eviction_interval_secs: u64,
}

impl Default for RateLimitingConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            window_secs: default_window(),
            eviction_interval_secs: default_eviction_interval(),
        }
    }
}

fn default_capacity() -> u64 {
    100
}

fn default_window() -> u64 {
    60
}

fn default_eviction_interval() -> u64 {
    60
}

impl RateLimitingConfig {
    /// Build the policy enforced on authenticated requests.
    pub fn policy(&self) -> Result<RateLimitPolicy> {
        RateLimitPolicy::new(self.capacity, Duration::from_secs(self.window_secs))
    }

    /// Interval between eviction sweeps.
    pub fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.eviction_interval_secs)
    }
}

/// `BIBLIO__SECTION__KEY` variables, layered over the file.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).separator("__")
}

impl BiblioConfig {
    /// Load configuration from an optional YAML file plus environment overrides.
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&str>, env: config::Environment) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::new(path, config::FileFormat::Yaml).required(true),
            );
        }

        let config: BiblioConfig = builder.add_source(env).build()?.try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: BiblioConfig = serde_yaml::from_str(yaml)
            .map_err(|e| BiblioError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.rate_limiting.window_secs == 0 {
            return Err(BiblioError::Config(
                "rate_limiting.window_secs must be greater than zero".to_string(),
            ));
        }
        if self.rate_limiting.eviction_interval_secs == 0 {
            return Err(BiblioError::Config(
                "rate_limiting.eviction_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.server.stream_poll_interval_ms == 0 {
            return Err(BiblioError::Config(
                "server.stream_poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.auth.token.is_empty() {
            return Err(BiblioError::Config("auth.token must not be empty".to_string()));
        }
        Ok(())
    }

    /// Poll interval of the NDJSON book stream.
    pub fn stream_poll_interval(&self) -> Duration {
        Duration::from_millis(self.server.stream_poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BiblioConfig::default();
        assert_eq!(config.server.http_addr.port(), 5000);
        assert_eq!(config.auth.token, "mysecrettoken");
        assert_eq!(config.rate_limiting.capacity, 100);
        assert_eq!(config.rate_limiting.window_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
rate_limiting:
  capacity: 2
auth:
  token: s3cret
"#;
        let config = BiblioConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.rate_limiting.capacity, 2);
        assert_eq!(config.rate_limiting.window_secs, 60);
        assert_eq!(config.auth.token, "s3cret");
        assert_eq!(config.server.stream_poll_interval_ms, 2000);

        let policy = config.rate_limiting.policy().unwrap();
        assert_eq!(policy.capacity(), 2);
        assert_eq!(policy.window(), Duration::from_secs(60));
    }

    #[test]
    fn test_zero_window_rejected() {
        let yaml = r#"
rate_limiting:
  window_secs: 0
"#;
        let err = BiblioConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, BiblioError::Config(_)));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let yaml = r#"
server:
  stream_poll_interval_ms: 0
"#;
        assert!(BiblioConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let err = BiblioConfig::from_yaml("rate_limiting: [").unwrap_err();
        assert!(matches!(err, BiblioError::Config(_)));
    }

    #[test]
    fn test_load_from_yaml_file() {
        let path = std::env::temp_dir().join(format!("biblio-config-{}.yaml", std::process::id()));
        std::fs::write(&path, "rate_limiting:\n  capacity: 7\n  window_secs: 30\n").unwrap();

        let config = BiblioConfig::load(path.to_str()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.rate_limiting.capacity, 7);
        assert_eq!(config.rate_limiting.window_secs, 30);
        assert_eq!(config.auth.token, "mysecrettoken");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = BiblioConfig::load(Some("/nonexistent/biblio.yaml")).unwrap_err();
        assert!(matches!(err, BiblioError::Config(_)));
    }

    fn env_from(vars: &[(&str, &str)]) -> config::Environment {
        let map = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn test_env_overrides_defaults() {
        let env = env_from(&[
            ("BIBLIO__RATE_LIMITING__CAPACITY", "5"),
            ("BIBLIO__AUTH__TOKEN", "from-env"),
            ("OTHER__RATE_LIMITING__WINDOW_SECS", "1"),
        ]);

        let config = BiblioConfig::load_with_env(None, env).unwrap();
        assert_eq!(config.rate_limiting.capacity, 5);
        assert_eq!(config.rate_limiting.window_secs, 60);
        assert_eq!(config.auth.token, "from-env");
    }

    #[test]
    fn test_env_overrides_yaml_file() {
        let path =
            std::env::temp_dir().join(format!("biblio-config-env-{}.yaml", std::process::id()));
        std::fs::write(&path, "rate_limiting:\n  capacity: 7\n  window_secs: 30\n").unwrap();

        let env = env_from(&[("BIBLIO__RATE_LIMITING__CAPACITY", "5")]);
        let config = BiblioConfig::load_with_env(path.to_str(), env).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.rate_limiting.capacity, 5);
        assert_eq!(config.rate_limiting.window_secs, 30);
    }

    #[test]
    fn test_env_values_are_validated() {
        let env = env_from(&[("BIBLIO__RATE_LIMITING__WINDOW_SECS", "0")]);
        let err = BiblioConfig::load_with_env(None, env).unwrap_err();
        assert!(matches!(err, BiblioError::Config(_)));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = BiblioConfig::load(None).unwrap();
        assert!(config.rate_limiting.window_secs > 0);
    }
}
