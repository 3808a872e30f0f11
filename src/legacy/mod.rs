//! CircleCI 1.0 (`circle.yml`) document model and loader

pub mod loader;
pub mod schema;

pub use loader::{LegacyConfigError, LegacySource, LEGACY_BACKUP_FILE, LEGACY_FILE};
pub use schema::{
    BranchSettings, DeploymentSettings, GeneralSettings, LegacyConfig, MachinePhase,
    NotificationSettings, Phase, VersionInfo,
};
