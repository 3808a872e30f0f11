//! 1.0 → 2.0 step translation
//!
//! Turns the legacy phases into the ordered `steps` list of the 2.0 build job:
//! bootstrap steps, app-type steps, the `dependencies`/`compile`/`test` phases,
//! the awscli install, and finally branch-guarded deploy commands.

pub mod deploy;
pub mod phases;
pub mod setup;
pub mod step;
pub mod translator;

pub use deploy::{deploy_steps, DeploySelector};
pub use step::{BuildStep, RunSpec};
pub use translator::{TranslateOptions, Translation, Translator};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("unexpected key in `deployment` map = {0}")]
    InvalidDeploymentKey(String),
}
