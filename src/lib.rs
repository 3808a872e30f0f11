//! circle-migrate - CircleCI 1.0 to 2.0 configuration migration
//!
//! Reads a repository's `circle.yml`, inspects the repository to decide which
//! docker images the 2.0 build needs, and writes an equivalent
//! `.circleci/config.yml`.
//!
//! # Pipeline
//!
//! - [`legacy`]: locate and parse `circle.yml` (or `circle.yml.bak`)
//! - [`detection`]: classify app type, runtime version and data stores
//! - [`images`]: map detection results to docker images
//! - [`translate`]: turn legacy phases into 2.0 steps
//! - [`output`]: assemble and serialize the 2.0 document
//! - [`migrate`]: run all of the above and write the result
//!
//! # Example
//!
//! ```no_run
//! use circle_migrate::{MigrateConfig, MigrateOptions, Migrator, RealFileSystem, WalkScanner};
//! use std::path::Path;
//!
//! let fs = RealFileSystem;
//! let scanner = WalkScanner::new();
//! let migrator = Migrator::new(&fs, &scanner, MigrateConfig::default());
//!
//! let plan = migrator.plan(Path::new("/src/github.com/Clever/catapult"))?;
//! println!("{}", plan.yaml);
//! # Ok::<(), circle_migrate::MigrationError>(())
//! ```

pub mod cli;
pub mod config;
pub mod detection;
pub mod fs;
pub mod images;
pub mod legacy;
pub mod migrate;
pub mod output;
pub mod scan;
pub mod translate;
pub mod util;

pub use config::{ConfigError, MigrateConfig};
pub use detection::{AppType, DatabaseType, Detector, ImageConstraints};
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use images::{DockerImage, ImageCatalog, ResolvedImages};
pub use legacy::{LegacyConfig, LegacyConfigError, LegacySource};
pub use migrate::{DetectionReport, MigrateOptions, MigrationError, MigrationOutcome, MigrationPlan, Migrator};
pub use output::{assemble, NewConfig};
pub use scan::{ContentScanner, GrepScanner, ScanBackend, ScanOutcome, StaticScanner, WalkScanner};
pub use translate::{BuildStep, TranslateError, Translator};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
