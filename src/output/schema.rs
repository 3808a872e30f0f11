//! CircleCI 2.0 document data structures
//!
//! Field order matches the layout CircleCI documents for `.circleci/config.yml`,
//! and serde keeps declaration order, so the generated file reads top-down the
//! way a hand-written one would.

use crate::images::DockerImage;
use crate::translate::setup::{ARTIFACTS_DIR, TEST_REPORTS_DIR};
use crate::translate::BuildStep;
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const CONFIG_VERSION: u32 = 2;

fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// Root of a generated `.circleci/config.yml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewConfig {
    pub version: u32,
    pub jobs: Jobs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jobs {
    pub build: BuildJob,
}

/// The single `build` job every migrated repository gets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildJob {
    pub working_directory: String,
    /// Primary image first; CircleCI runs steps in the first container
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub docker: Vec<DockerImage>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub environment: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub steps: Vec<BuildStep>,
}

/// Environment CircleCI 1.0 provided implicitly
pub fn legacy_environment() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("CIRCLE_ARTIFACTS".to_string(), ARTIFACTS_DIR.to_string()),
        ("CIRCLE_TEST_REPORTS".to_string(), TEST_REPORTS_DIR.to_string()),
    ])
}

/// Builds the 2.0 document from resolved images, working directory and steps
pub fn assemble(
    primary: DockerImage,
    auxiliary: Vec<DockerImage>,
    working_directory: impl Into<String>,
    steps: Vec<BuildStep>,
) -> NewConfig {
    let docker = std::iter::once(primary).chain(auxiliary).collect();

    NewConfig {
        version: CONFIG_VERSION,
        jobs: Jobs {
            build: BuildJob {
                working_directory: working_directory.into(),
                docker,
                environment: legacy_environment(),
                steps,
            },
        },
    }
}

impl NewConfig {
    pub fn build(&self) -> &BuildJob {
        &self.jobs.build
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize CircleCI 2.0 config to YAML")
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).context("Failed to parse CircleCI 2.0 config")
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != CONFIG_VERSION {
            anyhow::bail!("Unsupported config version {}", self.version);
        }
        let build = self.build();
        if build.working_directory.is_empty() {
            anyhow::bail!("Working directory cannot be empty");
        }
        if build.docker.is_empty() {
            anyhow::bail!("Build job needs at least one docker image");
        }
        if let Some((i, _)) = build
            .docker
            .iter()
            .enumerate()
            .find(|(_, d)| d.image.is_empty())
        {
            anyhow::bail!("docker[{}] image cannot be empty", i);
        }
        Ok(())
    }
}

impl fmt::Display for NewConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let build = self.build();
        writeln!(f, "CircleCI {} build job", self.version)?;
        writeln!(f, "  Working directory: {}", build.working_directory)?;
        writeln!(f, "  Images:")?;
        for image in &build.docker {
            writeln!(f, "    - {}", image.image)?;
        }
        writeln!(f, "  Steps: {}", build.steps.len())?;
        Ok(())
    }
}
