#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Tracker Client Configuration
//!
//! This crate handles loading, saving and overriding the client's settings:
//! - Endpoint connection settings (URL, timeout, retry policy)
//! - Transport authentication
//! - Logging configuration
//! - An optional operation catalog file replacing the built-in table
//!
//! Configuration is stored in TOML format and can be loaded from files,
//! overridden from `TRACKER_*` environment variables, or created with
//! defaults suitable for a local development server.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use transport::{AuthConfig, AuthType, TransportConfig};

/// Default endpoint of a local development server.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/rpc/json-rpc/trackerservice-v2";

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Configuration file was not found at the specified path
    #[error("Config file not found at: {0}")]
    NotFound(PathBuf),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
    /// A setting has an unusable value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Remote endpoint settings
    pub endpoint: EndpointConfig,
    /// Transport authentication (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Operation catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Endpoint connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Service URL
    pub url: String,
    /// Per-attempt timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Retries after connection-level failures
    #[serde(default)]
    pub max_retries: u32,
    /// Delay between retries in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_timeout_ms() -> u64 { 30_000 }

fn default_retry_delay_ms() -> u64 { 500 }

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log file path (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "info".to_string(), file: None } }
}

/// Operation catalog settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog file to load instead of the built-in operation table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/tracker-rpc/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir =
            dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("tracker-rpc");
        Ok(config_dir.join("config.toml"))
    }

    /// Apply `TRACKER_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Internal function for testing - allows injection of environment values
    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        fn parse<T: std::str::FromStr>(key: &str, raw: String) -> Result<T, ConfigError> {
            raw.parse().map_err(|_| ConfigError::Invalid(format!("{} has invalid value '{}'", key, raw)))
        }

        if let Some(url) = var("TRACKER_RPC_URL") {
            self.endpoint.url = url;
        }
        if let Some(raw) = var("TRACKER_RPC_TIMEOUT_MS") {
            self.endpoint.timeout_ms = parse("TRACKER_RPC_TIMEOUT_MS", raw)?;
        }
        if let Some(raw) = var("TRACKER_RPC_MAX_RETRIES") {
            self.endpoint.max_retries = parse("TRACKER_RPC_MAX_RETRIES", raw)?;
        }
        if let Some(raw) = var("TRACKER_RPC_RETRY_DELAY_MS") {
            self.endpoint.retry_delay_ms = parse("TRACKER_RPC_RETRY_DELAY_MS", raw)?;
        }
        if let Some(token) = var("TRACKER_RPC_TOKEN") {
            self.auth = Some(AuthConfig {
                auth_type: AuthType::Token,
                token: Some(token),
                ..Default::default()
            });
        } else if let (Some(user), Some(pass)) = (var("TRACKER_RPC_USER"), var("TRACKER_RPC_PASSWORD"))
        {
            self.auth = Some(AuthConfig {
                auth_type: AuthType::Basic,
                username: Some(user),
                password: Some(pass),
                token: None,
            });
        }
        if let Some(level) = var("TRACKER_LOG") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Check that the settings are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.endpoint.url.trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid("endpoint.url is empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "endpoint.url '{}' must use http or https",
                url
            )));
        }
        if let Some(auth) = &self.auth {
            match auth.auth_type {
                AuthType::Basic if auth.username.is_none() || auth.password.is_none() =>
                    return Err(ConfigError::Invalid(
                        "basic auth requires username and password".to_string(),
                    )),
                AuthType::Token if auth.token.is_none() =>
                    return Err(ConfigError::Invalid("token auth requires a token".to_string())),
                _ => {}
            }
        }
        Ok(())
    }

    /// Transport settings derived from this configuration.
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            endpoint: self.endpoint.url.clone(),
            auth: self.auth.clone(),
            timeout_ms: self.endpoint.timeout_ms,
            max_retries: self.endpoint.max_retries,
            retry_delay_ms: self.endpoint.retry_delay_ms,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig {
                url: DEFAULT_ENDPOINT.to_string(),
                timeout_ms: default_timeout_ms(),
                max_retries: 0,
                retry_delay_ms: default_retry_delay_ms(),
            },
            auth: None,
            logging: LoggingConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_from_file() {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        let toml_content = r#"
            [endpoint]
            url = "https://tracker.example.com/rpc"
            timeout_ms = 5000
            max_retries = 2

            [auth]
            auth_type = "basic"
            username = "admin"
            password = "secret"

            [logging]
            level = "debug"
            file = "tracker.log"

            [catalog]
            path = "catalog.json"
        "#;
        fs::write(&temp_file, toml_content).expect("Failed to write TOML content");

        let config = Config::from_file(&temp_file).expect("Failed to load config");
        assert_eq!(config.endpoint.url, "https://tracker.example.com/rpc");
        assert_eq!(config.endpoint.timeout_ms, 5000);
        assert_eq!(config.endpoint.max_retries, 2);
        assert_eq!(config.endpoint.retry_delay_ms, 500);
        let auth = config.auth.as_ref().expect("auth section");
        assert_eq!(auth.auth_type, AuthType::Basic);
        assert_eq!(auth.username.as_deref(), Some("admin"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("tracker.log")));
        assert_eq!(config.catalog.path, Some(PathBuf::from("catalog.json")));
        config.validate().expect("valid config");
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        fs::write(&temp_file, "[endpoint]\nurl = \"http://localhost:9000\"\n")
            .expect("Failed to write TOML content");

        let config = Config::from_file(&temp_file).expect("Failed to load config");
        assert_eq!(config.endpoint.timeout_ms, 30_000);
        assert!(config.auth.is_none());
        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(config.catalog, CatalogConfig::default());
    }

    #[test]
    fn test_from_file_errors() {
        let missing = Config::from_file("/definitely/not/here/config.toml");
        assert!(matches!(missing, Err(ConfigError::NotFound(_))));

        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        fs::write(&temp_file, "[endpoint\nurl=").expect("write");
        assert!(matches!(Config::from_file(&temp_file), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_round_trip() {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        let mut config = Config::default();
        config.auth = Some(AuthConfig {
            auth_type: AuthType::Token,
            token: Some("abc".to_string()),
            ..Default::default()
        });
        config.save(&temp_file).expect("save");

        let loaded = Config::from_file(&temp_file).expect("reload");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_apply_vars() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TRACKER_RPC_URL", "https://other.example.com/rpc"),
            ("TRACKER_RPC_MAX_RETRIES", "4"),
            ("TRACKER_RPC_USER", "bob"),
            ("TRACKER_RPC_PASSWORD", "hunter2"),
            ("TRACKER_LOG", "trace"),
        ]);
        let mut config = Config::default();
        config.apply_vars(|k| vars.get(k).map(|v| v.to_string())).expect("apply");

        assert_eq!(config.endpoint.url, "https://other.example.com/rpc");
        assert_eq!(config.endpoint.max_retries, 4);
        assert_eq!(config.logging.level, "trace");
        let auth = config.auth.expect("basic auth from env");
        assert_eq!(auth.auth_type, AuthType::Basic);
        assert_eq!(auth.password.as_deref(), Some("hunter2"));

        let mut config = Config::default();
        let err = config
            .apply_vars(|k| (k == "TRACKER_RPC_TIMEOUT_MS").then(|| "soon".to_string()))
            .expect_err("bad number");
        assert!(err.to_string().contains("TRACKER_RPC_TIMEOUT_MS"));
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        config.validate().expect("default is valid");

        config.endpoint.url = "ftp://x".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.endpoint.url = "http://x".to_string();
        config.auth = Some(AuthConfig { auth_type: AuthType::Basic, ..Default::default() });
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_transport_config() {
        let mut config = Config::default();
        config.endpoint.max_retries = 3;
        let transport = config.transport_config();
        assert_eq!(transport.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(transport.max_retries, 3);
        assert_eq!(transport.timeout_ms, 30_000);
        assert!(transport.auth.is_none());
    }

    #[test]
    fn test_default_path() {
        if let Ok(path) = Config::default_path() {
            assert!(path.ends_with("tracker-rpc/config.toml"));
        }
    }
}
