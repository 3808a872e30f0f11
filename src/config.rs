//! Configuration management for circle-migrate
//!
//! Settings load from environment variables with defaults; command-line flags
//! override them afterwards.
//!
//! # Environment Variables
//!
//! - `CIRCLE_MIGRATE_ORG`: GitHub organization in the working directory - default: "Clever"
//! - `CIRCLE_MIGRATE_LOG_LEVEL`: Logging level - default: "info"
//! - `CIRCLE_MIGRATE_SCAN_BACKEND`: Content scan backend (grep|builtin) - default: "grep"
//! - `CIRCLE_MIGRATE_CI_SCRIPTS_URL`: Repository cloned by the "Clone ci-scripts" step
//!
//! # Example
//!
//! ```no_run
//! use circle_migrate::MigrateConfig;
//!
//! let config = MigrateConfig::default();
//! config.validate().expect("Invalid configuration");
//! let scanner = config.create_scanner().expect("Unknown scan backend");
//! ```

use crate::scan::{ContentScanner, ScanBackend};
use crate::translate::setup::DEFAULT_CI_SCRIPTS_URL;
use std::env;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_ORG: &str = "Clever";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_SCAN_BACKEND: &str = "grep";

pub const ORG_ENV: &str = "CIRCLE_MIGRATE_ORG";
pub const LOG_LEVEL_ENV: &str = "CIRCLE_MIGRATE_LOG_LEVEL";
pub const SCAN_BACKEND_ENV: &str = "CIRCLE_MIGRATE_SCAN_BACKEND";
pub const CI_SCRIPTS_URL_ENV: &str = "CIRCLE_MIGRATE_CI_SCRIPTS_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid scan backend: {0}. Valid options: grep, builtin")]
    InvalidScanBackend(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateConfig {
    /// GitHub organization segment of the job's working directory
    pub org: String,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Raw backend name; resolved by [`MigrateConfig::scan_backend`]
    pub scan_backend: String,

    pub ci_scripts_url: String,
}

impl Default for MigrateConfig {
    /// Loads from `CIRCLE_MIGRATE_*` environment variables, falling back to defaults
    fn default() -> Self {
        let org = env::var(ORG_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ORG.to_string());

        let log_level = env::var(LOG_LEVEL_ENV)
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let scan_backend = env::var(SCAN_BACKEND_ENV)
            .unwrap_or_else(|_| DEFAULT_SCAN_BACKEND.to_string())
            .to_lowercase();

        let ci_scripts_url = env::var(CI_SCRIPTS_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CI_SCRIPTS_URL.to_string());

        Self {
            org,
            log_level,
            scan_backend,
            ci_scripts_url,
        }
    }
}

impl MigrateConfig {
    /// Checks that:
    /// - the org is a single path segment
    /// - the log level is known
    /// - the scan backend is known
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.org.is_empty() || self.org.contains('/') {
            return Err(ConfigError::ValidationFailed(format!(
                "Organization must be a single path segment, got {:?}",
                self.org
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        if self.ci_scripts_url.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "ci-scripts URL cannot be empty".to_string(),
            ));
        }

        self.scan_backend()?;
        Ok(())
    }

    pub fn scan_backend(&self) -> Result<ScanBackend, ConfigError> {
        ScanBackend::from_name(&self.scan_backend)
            .ok_or_else(|| ConfigError::InvalidScanBackend(self.scan_backend.clone()))
    }

    pub fn create_scanner(&self) -> Result<Box<dyn ContentScanner>, ConfigError> {
        Ok(self.scan_backend()?.create_scanner())
    }

    pub fn to_display_map(&self) -> std::collections::BTreeMap<String, String> {
        let mut map = std::collections::BTreeMap::new();
        map.insert("org".to_string(), self.org.clone());
        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert("scan_backend".to_string(), self.scan_backend.clone());
        map.insert("ci_scripts_url".to_string(), self.ci_scripts_url.clone());
        map
    }
}

impl fmt::Display for MigrateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "circle-migrate Configuration:")?;
        writeln!(f, "  Org: {}", self.org)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Scan Backend: {}", self.scan_backend)?;
        writeln!(f, "  ci-scripts URL: {}", self.ci_scripts_url)?;
        Ok(())
    }
}
