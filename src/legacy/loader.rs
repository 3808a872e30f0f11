//! Locating and reading the legacy document

use super::LegacyConfig;
use crate::fs::FileSystem;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const LEGACY_FILE: &str = "circle.yml";

/// Where a previous run renamed the legacy document
pub const LEGACY_BACKUP_FILE: &str = "circle.yml.bak";

#[derive(Error, Debug)]
pub enum LegacyConfigError {
    #[error("circle.yml not found at {} or {}", .primary.display(), .backup.display())]
    NotFound { primary: PathBuf, backup: PathBuf },
    #[error("Failed to read {path}: {message}")]
    ReadError { path: PathBuf, message: String },
    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// A parsed legacy document together with the raw text it came from
///
/// Detection greps the raw text (for database names and machine versions), so
/// both views travel together.
#[derive(Debug, Clone)]
pub struct LegacySource {
    pub path: PathBuf,
    pub raw: String,
    pub config: LegacyConfig,
}

impl LegacySource {
    /// Finds circle.yml in the repository, falling back to circle.yml.bak
    pub fn locate(fs: &dyn FileSystem, repo_root: &Path) -> Result<Self, LegacyConfigError> {
        let primary = repo_root.join(LEGACY_FILE);
        let backup = repo_root.join(LEGACY_BACKUP_FILE);

        let path = if fs.is_file(&primary) {
            primary
        } else if fs.is_file(&backup) {
            info!(path = %backup.display(), "circle.yml missing, using backup from a previous run");
            backup
        } else {
            return Err(LegacyConfigError::NotFound { primary, backup });
        };

        Self::load(fs, &path)
    }

    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self, LegacyConfigError> {
        let raw = fs
            .read_to_string(path)
            .map_err(|e| LegacyConfigError::ReadError {
                path: path.to_path_buf(),
                message: format!("{:#}", e),
            })?;

        Self::parse(path, raw)
    }

    pub fn parse(path: &Path, raw: String) -> Result<Self, LegacyConfigError> {
        let config =
            LegacyConfig::from_yaml(&raw).map_err(|source| LegacyConfigError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            path = %path.display(),
            bytes = raw.len(),
            deployment_keys = ?config.deployment.keys().collect::<Vec<_>>(),
            "Parsed legacy configuration"
        );

        Ok(Self {
            path: path.to_path_buf(),
            raw,
            config,
        })
    }

    /// True when the document was loaded from the primary location
    pub fn is_primary(&self) -> bool {
        self.path.file_name().and_then(|n| n.to_str()) == Some(LEGACY_FILE)
    }
}
