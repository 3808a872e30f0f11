//! circle.yml schema data structures
//!
//! Every section is optional in real-world files, and YAML authors frequently
//! leave keys present but empty (`pre:` with no list). Both cases deserialize to
//! the empty default so downstream translation never has to special-case null.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// Root of a parsed circle.yml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyConfig {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub machine: MachinePhase,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub checkout: Phase,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub dependencies: Phase,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub database: Phase,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub compile: Phase,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub test: Phase,
    /// Keyed by branch selector; keys are validated at translation time
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub deployment: BTreeMap<String, DeploymentSettings>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub notify: NotificationSettings,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub general: GeneralSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachinePhase {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub pre: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub post: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub environment: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub timezone: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub hosts: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub ruby: VersionInfo,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub node: VersionInfo,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub java: VersionInfo,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub php: VersionInfo,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub python: VersionInfo,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub ghc: VersionInfo,
    /// Background services requested on the 1.0 build machine (docker, redis, ...)
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub services: Vec<String>,
}

/// Language version pinned on the 1.0 build machine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    #[serde(default, deserialize_with = "deserialize_version")]
    pub version: String,
}

/// Versions are written both quoted and bare (`version: 6` vs `version: "6.1"`)
fn deserialize_version<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_yaml::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_yaml::Value::String(s)) => s,
        Some(serde_yaml::Value::Number(n)) => n.to_string(),
        Some(serde_yaml::Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// A phase runs `pre`, then `override`, then `post`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub pre: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub r#override: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub post: Vec<String>,
}

impl Phase {
    pub fn is_empty(&self) -> bool {
        self.pre.is_empty() && self.r#override.is_empty() && self.post.is_empty()
    }

    /// Commands in execution order
    pub fn commands(&self) -> impl Iterator<Item = &String> {
        self.pre
            .iter()
            .chain(self.r#override.iter())
            .chain(self.post.iter())
    }
}

/// When and how to deploy after tests pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentSettings {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub branch: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub owner: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub webhooks: Vec<serde_yaml::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub branches: BranchSettings,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub build_dir: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub artifacts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchSettings {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub ignore: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub only: Vec<String>,
}

impl LegacyConfig {
    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    /// Sections present in the document that the 2.0 translation drops
    pub fn untranslated_sections(&self) -> Vec<&'static str> {
        let mut sections = Vec::new();
        let machine = &self.machine;

        if !machine.pre.is_empty() {
            sections.push("machine.pre");
        }
        if !machine.post.is_empty() {
            sections.push("machine.post");
        }
        if !machine.environment.is_empty() {
            sections.push("machine.environment");
        }
        if !machine.timezone.is_empty() {
            sections.push("machine.timezone");
        }
        if !machine.hosts.is_empty() {
            sections.push("machine.hosts");
        }
        if !self.checkout.is_empty() {
            sections.push("checkout");
        }
        if !self.database.is_empty() {
            sections.push("database");
        }
        if !self.notify.webhooks.is_empty() {
            sections.push("notify.webhooks");
        }
        if !self.general.branches.ignore.is_empty() || !self.general.branches.only.is_empty() {
            sections.push("general.branches");
        }
        if !self.general.build_dir.is_empty() {
            sections.push("general.build_dir");
        }
        if !self.general.artifacts.is_empty() {
            sections.push("general.artifacts");
        }

        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let yaml = r#"
machine:
  services:
    - docker
  node:
    version: 6
dependencies:
  pre:
    - make install_deps
  override:
    - echo "skip"
compile:
  override:
    - make build
test:
  override:
    - make test
deployment:
  master:
    owner: Clever
    branch: master
    commands:
      - make publish
  all:
    branch: /.*/
    commands:
      - echo all
"#;
        let config = LegacyConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.machine.services, vec!["docker"]);
        assert_eq!(config.machine.node.version, "6");
        assert_eq!(config.dependencies.pre, vec!["make install_deps"]);
        assert_eq!(config.compile.r#override, vec!["make build"]);
        assert_eq!(config.test.r#override, vec!["make test"]);
        assert_eq!(config.deployment["master"].owner, "Clever");
        assert_eq!(config.deployment["master"].commands, vec!["make publish"]);
        assert_eq!(config.deployment["all"].branch, "/.*/");
    }

    #[test]
    fn test_null_sections_are_empty() {
        let yaml = "machine:\ncompile:\n  pre:\n  override:\n    - make\ndeployment:\n";
        let config = LegacyConfig::from_yaml(yaml).unwrap();

        assert!(config.machine.services.is_empty());
        assert!(config.compile.pre.is_empty());
        assert_eq!(config.compile.r#override, vec!["make"]);
        assert!(config.deployment.is_empty());
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(LegacyConfig::from_yaml("").unwrap(), LegacyConfig::default());
        assert_eq!(
            LegacyConfig::from_yaml("  \n").unwrap(),
            LegacyConfig::default()
        );
    }

    #[test]
    fn test_malformed_document() {
        assert!(LegacyConfig::from_yaml("test: [unclosed").is_err());
        assert!(LegacyConfig::from_yaml("test:\n  override: 5\n").is_err());
    }

    #[test]
    fn test_phase_commands_order() {
        let phase = Phase {
            pre: vec!["a".into()],
            r#override: vec!["b".into(), "c".into()],
            post: vec!["d".into()],
        };
        let commands: Vec<&String> = phase.commands().collect();
        assert_eq!(commands, vec!["a", "b", "c", "d"]);
        assert!(!phase.is_empty());
        assert!(Phase::default().is_empty());
    }

    #[test]
    fn test_untranslated_sections() {
        let yaml = r#"
machine:
  pre:
    - sudo apt-get update
  environment:
    GOPATH: /home/ubuntu/go
database:
  override:
    - make db
general:
  branches:
    ignore:
      - gh-pages
notify:
  webhooks:
    - url: https://example.com/hook
"#;
        let config = LegacyConfig::from_yaml(yaml).unwrap();
        assert_eq!(
            config.untranslated_sections(),
            vec![
                "machine.pre",
                "machine.environment",
                "database",
                "notify.webhooks",
                "general.branches"
            ]
        );
        assert!(LegacyConfig::default().untranslated_sections().is_empty());
    }
}
