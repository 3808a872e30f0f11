//! Repository heuristics
//!
//! Works out what kind of application a repository holds, which runtime
//! version it targets, and which data stores its tests talk to. Detection never
//! fails: anything it cannot establish falls back to a default and is logged.

#[macro_use]
pub mod id_enum_macro;

pub mod detector;
pub mod inputs;
pub mod rules;
pub mod services;
pub mod types;
pub mod versions;
pub mod workdir;

pub use detector::Detector;
pub use inputs::DetectionInputs;
pub use rules::{ClassificationRule, VersionSource};
pub use types::{AppType, DatabaseType, ImageConstraints};
pub use workdir::{repository_name, working_directory, WorkdirError};
