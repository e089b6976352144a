//! Configuration Management
//!
//! Optional JSON configuration for ocinv. Command-line flags take precedence.

use crate::oci::client::Service;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default worker pool size
pub const DEFAULT_MAX_WORKERS: usize = 5;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Concurrent compartment scans
    #[serde(default)]
    pub max_workers: Option<usize>,
    /// Per-request timeout in seconds
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Optional services to treat as unavailable (e.g. "waas")
    #[serde(default)]
    pub disabled_services: Vec<String>,
    /// Service name to base URL overrides
    #[serde(default)]
    pub endpoints: HashMap<String, String>,
}

impl Config {
    /// Get the default config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ocinv").join("config.json"))
    }

    /// Load configuration from the default location.
    /// A missing or unreadable file gives defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config file {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content).context("Malformed config file")
    }

    /// Get effective worker count (CLI > config > default), at least 1
    pub fn effective_workers(&self, cli: Option<usize>) -> usize {
        cli.or(self.max_workers)
            .unwrap_or(DEFAULT_MAX_WORKERS)
            .max(1)
    }

    pub fn effective_request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Whether an optional service is switched off
    pub fn is_disabled(&self, service: Service) -> bool {
        service.is_optional()
            && self
                .disabled_services
                .iter()
                .any(|s| s.eq_ignore_ascii_case(service.as_str()))
    }

    /// Endpoint for a service (override > regional default)
    pub fn endpoint_for(&self, service: Service, region: &str) -> String {
        self.endpoints
            .get(service.as_str())
            .cloned()
            .unwrap_or_else(|| service.endpoint(region))
    }
}
