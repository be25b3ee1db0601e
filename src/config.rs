//! Configuration management for the explorer.
//!
//! Handles loading configuration from TOML files and environment variables:
//! the query RPC endpoint, API key, request deadline, and the column
//! derivation policy for normalized tables.

use crate::error::{ExplorerError, Result};
use crate::table::SchemaInference;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// Re-export url for endpoint validation
use url::Url;

/// Main configuration structure for the explorer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote query service settings.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Result shaping settings.
    #[serde(default)]
    pub results: ResultsConfig,
}

/// Remote query service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Query RPC endpoint URL.
    pub endpoint: Option<String>,

    /// API key forwarded with each request (not recommended to store in
    /// config; prefer the ISTA_API_KEY environment variable).
    pub api_key: Option<String>,

    /// Per-request deadline in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Result shaping configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResultsConfig {
    /// Column derivation policy ("first-row" or "union-of-keys").
    #[serde(default)]
    pub schema_inference: SchemaInference,
}

impl RemoteConfig {
    /// Validates and returns the endpoint URL.
    pub fn endpoint_url(&self) -> Result<Url> {
        let raw = self
            .endpoint
            .as_deref()
            .ok_or_else(|| ExplorerError::config("Query endpoint is not configured"))?;

        let url = Url::parse(raw)
            .map_err(|e| ExplorerError::config(format!("Invalid endpoint URL: {e}")))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ExplorerError::config(format!(
                "Invalid scheme '{}'. Expected 'http' or 'https'",
                url.scheme()
            )));
        }

        Ok(url)
    }

    /// Applies environment variables (ISTA_ENDPOINT, ISTA_API_KEY) as defaults.
    pub fn apply_env_defaults(&mut self) {
        if self.endpoint.is_none() {
            self.endpoint = std::env::var("ISTA_ENDPOINT").ok();
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var("ISTA_API_KEY").ok();
        }
    }

    /// Returns the per-request deadline as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ista-explorer")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ExplorerError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ExplorerError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
