//! End-to-end migration of one repository
//!
//! Everything that can fail is computed before the first write: a run either
//! produces `.circleci/config.yml` (and renames `circle.yml`) or touches
//! nothing.

use crate::config::MigrateConfig;
use crate::detection::{working_directory, Detector, ImageConstraints, WorkdirError};
use crate::fs::FileSystem;
use crate::images::{ImageCatalog, ResolvedImages};
use crate::legacy::{LegacyConfigError, LegacySource, LEGACY_BACKUP_FILE};
use crate::output::{assemble, NewConfig};
use crate::scan::ContentScanner;
use crate::translate::setup::NPMRC_TEMPLATE;
use crate::translate::{TranslateError, TranslateOptions, Translator};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const OUTPUT_DIR: &str = ".circleci";
pub const OUTPUT_FILE: &str = "config.yml";
pub const MAKEFILE: &str = "Makefile";

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Legacy(#[from] LegacyConfigError),

    #[error("error translating deploy steps: {0}")]
    Translate(#[from] TranslateError),

    #[error(transparent)]
    Workdir(#[from] WorkdirError),

    #[error("Generated config is invalid: {0}")]
    InvalidConfig(String),

    #[error("Failed to serialize generated config: {0}")]
    Serialize(String),

    #[error("Failed to create {path}: {message}")]
    CreateDir { path: PathBuf, message: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("Failed to rename {from} to {to}: {message}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct MigrateOptions {
    /// Compute and return the document without writing or renaming anything
    pub dry_run: bool,
    /// Target file; defaults to `<repo>/.circleci/config.yml`
    pub output: Option<PathBuf>,
    pub rename_legacy: bool,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            output: None,
            rename_legacy: true,
        }
    }
}

/// What detection and image resolution concluded about a repository
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub repository: PathBuf,
    pub constraints: ImageConstraints,
    pub images: ResolvedImages,
    pub working_directory: String,
    /// Legacy document used as input, if one was found
    pub legacy_file: Option<PathBuf>,
}

/// A fully computed migration, not yet written
#[derive(Debug, Clone)]
pub struct MigrationPlan {
    pub legacy: LegacySource,
    pub report: DetectionReport,
    pub config: NewConfig,
    pub yaml: String,
    /// Legacy sections the 2.0 document does not carry over
    pub untranslated: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    pub plan: MigrationPlan,
    pub written: Option<PathBuf>,
    pub renamed: Option<PathBuf>,
}

pub struct Migrator<'a> {
    fs: &'a dyn FileSystem,
    scanner: &'a dyn ContentScanner,
    catalog: ImageCatalog,
    config: MigrateConfig,
}

impl<'a> Migrator<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        scanner: &'a dyn ContentScanner,
        config: MigrateConfig,
    ) -> Self {
        Self {
            fs,
            scanner,
            catalog: ImageCatalog::default(),
            config,
        }
    }

    pub fn with_catalog(mut self, catalog: ImageCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    fn report(
        &self,
        repo_root: &Path,
        legacy: Option<&LegacySource>,
    ) -> Result<DetectionReport, MigrationError> {
        let makefile = self.fs.read_optional_lossy(&repo_root.join(MAKEFILE));
        if makefile.is_none() {
            debug!("No readable Makefile, skipping Makefile heuristics");
        }
        let legacy_raw = legacy.map(|l| l.raw.as_str()).unwrap_or_default();

        let constraints =
            Detector::new(self.fs, self.scanner).detect(repo_root, makefile.as_deref(), legacy_raw);
        let images = self.catalog.resolve(&constraints);
        let working_directory =
            working_directory(constraints.app_type, repo_root, &self.config.org)?;

        Ok(DetectionReport {
            repository: repo_root.to_path_buf(),
            constraints,
            images,
            working_directory,
            legacy_file: legacy.map(|l| l.path.clone()),
        })
    }

    /// Runs detection only; a missing legacy document is not an error here
    pub fn detect(&self, repo_root: &Path) -> Result<DetectionReport, MigrationError> {
        let legacy = match LegacySource::locate(self.fs, repo_root) {
            Ok(legacy) => Some(legacy),
            Err(err @ LegacyConfigError::NotFound { .. }) => {
                warn!("{}, detecting without it", err);
                None
            }
            Err(err) => return Err(err.into()),
        };
        self.report(repo_root, legacy.as_ref())
    }

    /// Computes the 2.0 document without side effects
    pub fn plan(&self, repo_root: &Path) -> Result<MigrationPlan, MigrationError> {
        let legacy = LegacySource::locate(self.fs, repo_root)?;
        let report = self.report(repo_root, Some(&legacy))?;

        let options = TranslateOptions {
            ci_scripts_url: self.config.ci_scripts_url.clone(),
            has_npmrc_template: self.fs.exists(&repo_root.join(NPMRC_TEMPLATE)),
        };
        let translation =
            Translator::new(&self.catalog, options).translate(&legacy.config, &report.constraints)?;

        let mut auxiliary = report.images.auxiliary.clone();
        auxiliary.extend(translation.service_images);

        let config = assemble(
            report.images.primary.clone(),
            auxiliary,
            report.working_directory.clone(),
            translation.steps,
        );
        config
            .validate()
            .map_err(|e| MigrationError::InvalidConfig(format!("{:#}", e)))?;
        let yaml = config
            .to_yaml()
            .map_err(|e| MigrationError::Serialize(format!("{:#}", e)))?;

        let untranslated = legacy.config.untranslated_sections();
        for section in &untranslated {
            warn!(section = *section, "Legacy section is not carried over, migrate it by hand");
        }

        Ok(MigrationPlan {
            legacy,
            report,
            config,
            yaml,
            untranslated,
        })
    }

    pub fn output_path(repo_root: &Path, options: &MigrateOptions) -> PathBuf {
        options
            .output
            .clone()
            .unwrap_or_else(|| repo_root.join(OUTPUT_DIR).join(OUTPUT_FILE))
    }

    pub fn migrate(
        &self,
        repo_root: &Path,
        options: &MigrateOptions,
    ) -> Result<MigrationOutcome, MigrationError> {
        let plan = self.plan(repo_root)?;

        if options.dry_run {
            info!("Dry run, nothing written");
            return Ok(MigrationOutcome {
                plan,
                written: None,
                renamed: None,
            });
        }

        let output = Self::output_path(repo_root, options);
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !self.fs.is_dir(parent) {
                debug!(path = %parent.display(), "Creating output directory");
                self.fs
                    .create_dir_all(parent)
                    .map_err(|e| MigrationError::CreateDir {
                        path: parent.to_path_buf(),
                        message: format!("{:#}", e),
                    })?;
            }
        }

        self.fs
            .write(&output, &plan.yaml)
            .map_err(|e| MigrationError::Write {
                path: output.clone(),
                message: format!("{:#}", e),
            })?;
        info!(path = %output.display(), "Wrote CircleCI 2.0 config");

        let renamed = if options.rename_legacy && plan.legacy.is_primary() {
            let backup = repo_root.join(LEGACY_BACKUP_FILE);
            self.fs
                .rename(&plan.legacy.path, &backup)
                .map_err(|e| MigrationError::Rename {
                    from: plan.legacy.path.clone(),
                    to: backup.clone(),
                    message: format!("{:#}", e),
                })?;
            info!(path = %backup.display(), "Renamed legacy circle.yml");
            Some(backup)
        } else {
            None
        };

        Ok(MigrationOutcome {
            plan,
            written: Some(output),
            renamed,
        })
    }
}
