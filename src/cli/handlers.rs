//! Subcommand handlers
//!
//! Each handler returns the process exit code: 0 on success, 1 on any hard
//! failure (after printing the error to stderr).

use super::commands::{DetectArgs, MigrateArgs, ScanBackendArg};
use super::output::{OutputFormat, OutputFormatter};
use crate::config::MigrateConfig;
use crate::fs::RealFileSystem;
use crate::migrate::{MigrateOptions, Migrator};
use crate::scan::ScanBackend;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Applies command-line overrides on top of the environment configuration
pub fn apply_overrides(
    mut config: MigrateConfig,
    org: Option<&str>,
    scan_backend: Option<ScanBackendArg>,
) -> MigrateConfig {
    if let Some(org) = org {
        config.org = org.to_string();
    }
    if let Some(backend) = scan_backend {
        config.scan_backend = ScanBackend::from(backend).as_str().to_string();
    }
    config
}

/// Absolute repository path; the working directory is derived from its name
fn resolve_repository(path: Option<&Path>) -> Result<PathBuf> {
    let path = path.unwrap_or_else(|| Path::new("."));
    path.canonicalize()
        .with_context(|| format!("Repository path {} is not accessible", path.display()))
}

fn fail(err: impl std::fmt::Display) -> i32 {
    error!("{}", err);
    eprintln!("Error: {}", err);
    1
}

pub fn handle_migrate(args: &MigrateArgs, config: MigrateConfig, quiet: bool) -> i32 {
    match run_migrate(args, config, quiet) {
        Ok(()) => 0,
        Err(err) => fail(format!("{:#}", err)),
    }
}

fn run_migrate(args: &MigrateArgs, config: MigrateConfig, quiet: bool) -> Result<()> {
    let config = apply_overrides(config, args.org.as_deref(), args.scan_backend);
    config.validate()?;
    let repo_root = resolve_repository(args.repository_path.as_deref())?;
    debug!(repository = %repo_root.display(), backend = %config.scan_backend, "Migrating");

    let fs = RealFileSystem;
    let scanner = config.create_scanner()?;
    let migrator = Migrator::new(&fs, scanner.as_ref(), config);
    let options = MigrateOptions {
        dry_run: args.dry_run,
        output: args.output.clone(),
        rename_legacy: !args.no_rename,
    };

    let outcome = migrator.migrate(&repo_root, &options)?;

    if options.dry_run {
        print!("{}", outcome.plan.yaml);
    } else if !quiet {
        print!("{}", OutputFormatter::new(OutputFormat::Human).format_outcome(&outcome));
    }
    Ok(())
}

pub fn handle_detect(args: &DetectArgs, config: MigrateConfig) -> i32 {
    match run_detect(args, config) {
        Ok(()) => 0,
        Err(err) => fail(format!("{:#}", err)),
    }
}

fn run_detect(args: &DetectArgs, config: MigrateConfig) -> Result<()> {
    let config = apply_overrides(config, args.org.as_deref(), args.scan_backend);
    config.validate()?;
    let repo_root = resolve_repository(args.repository_path.as_deref())?;

    let fs = RealFileSystem;
    let scanner = config.create_scanner()?;
    let report = Migrator::new(&fs, scanner.as_ref(), config).detect(&repo_root)?;

    let output = OutputFormatter::new(args.format.into()).format_report(&report)?;
    println!("{}", output.trim_end());
    Ok(())
}
