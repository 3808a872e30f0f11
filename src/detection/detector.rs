use super::rules::{classify, default_rules, ClassificationRule};
use super::services::detect_database_types;
use super::{DetectionInputs, ImageConstraints};
use crate::fs::FileSystem;
use crate::scan::ContentScanner;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Classifies a repository into [`ImageConstraints`]
pub struct Detector<'a> {
    fs: &'a dyn FileSystem,
    scanner: &'a dyn ContentScanner,
    rules: Vec<ClassificationRule>,
}

impl<'a> Detector<'a> {
    pub fn new(fs: &'a dyn FileSystem, scanner: &'a dyn ContentScanner) -> Self {
        Self {
            fs,
            scanner,
            rules: default_rules(),
        }
    }

    pub fn with_rules(mut self, rules: Vec<ClassificationRule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    pub fn detect(
        &self,
        repo_root: &Path,
        makefile: Option<&str>,
        legacy_raw: &str,
    ) -> ImageConstraints {
        let start = Instant::now();
        let inputs = DetectionInputs::new(self.fs, repo_root, makefile, legacy_raw);

        let (app_type, version, rule) = classify(&self.rules, &inputs);
        debug!(app_type = %app_type, version = %version, rule = ?rule, "Classified repository");

        let database_types = detect_database_types(&inputs, self.scanner);

        info!(
            app_type = %app_type,
            version = %version,
            databases = ?database_types,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Detected image constraints"
        );

        ImageConstraints {
            app_type,
            version,
            database_types,
        }
    }
}
