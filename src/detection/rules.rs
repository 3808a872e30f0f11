//! Application type classification
//!
//! Rules are evaluated in order and the first one whose predicate holds decides
//! both the application type and where its version comes from.

use super::versions::{go_version, node_version, DEFAULT_PYTHON_VERSION};
use super::{AppType, DetectionInputs};
use regex::Regex;
use std::sync::OnceLock;

/// How a matched rule obtains the runtime version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    Go,
    Node,
    Fixed(&'static str),
}

impl VersionSource {
    pub fn resolve(&self, inputs: &DetectionInputs<'_>) -> String {
        match self {
            VersionSource::Go => go_version(inputs.makefile()),
            VersionSource::Node => node_version(inputs),
            VersionSource::Fixed(version) => version.to_string(),
        }
    }
}

/// One entry of the classification cascade
#[derive(Clone, Copy)]
pub struct ClassificationRule {
    pub name: &'static str,
    pub matches: fn(&DetectionInputs<'_>) -> bool,
    pub app_type: AppType,
    pub version: VersionSource,
}

impl std::fmt::Debug for ClassificationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationRule")
            .field("name", &self.name)
            .field("app_type", &self.app_type)
            .field("version", &self.version)
            .finish()
    }
}

fn python_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"pylint|python|pep8").expect("valid regex"))
}

fn has_package_json(inputs: &DetectionInputs<'_>) -> bool {
    inputs.has_file("package.json")
}

fn has_swagger(inputs: &DetectionInputs<'_>) -> bool {
    inputs.has_file("swagger.yml")
}

fn has_golang_mk(inputs: &DetectionInputs<'_>) -> bool {
    inputs.has_file("golang.mk")
}

fn has_node_mk(inputs: &DetectionInputs<'_>) -> bool {
    inputs.has_file("node.mk")
}

fn makefile_mentions_python(inputs: &DetectionInputs<'_>) -> bool {
    python_regex().is_match(inputs.makefile())
}

/// The cascade in priority order
pub fn default_rules() -> Vec<ClassificationRule> {
    vec![
        ClassificationRule {
            name: "package.json",
            matches: has_package_json,
            app_type: AppType::Node,
            version: VersionSource::Node,
        },
        ClassificationRule {
            name: "swagger.yml",
            matches: has_swagger,
            app_type: AppType::Wag,
            version: VersionSource::Go,
        },
        ClassificationRule {
            name: "golang.mk",
            matches: has_golang_mk,
            app_type: AppType::Go,
            version: VersionSource::Go,
        },
        ClassificationRule {
            name: "node.mk",
            matches: has_node_mk,
            app_type: AppType::Node,
            version: VersionSource::Node,
        },
        ClassificationRule {
            name: "Makefile python tooling",
            matches: makefile_mentions_python,
            app_type: AppType::Python,
            version: VersionSource::Fixed(DEFAULT_PYTHON_VERSION),
        },
    ]
}

/// Runs the cascade, returning the app type, version and deciding rule name
pub fn classify(
    rules: &[ClassificationRule],
    inputs: &DetectionInputs<'_>,
) -> (AppType, String, Option<&'static str>) {
    rules
        .iter()
        .find(|rule| (rule.matches)(inputs))
        .map(|rule| (rule.app_type, rule.version.resolve(inputs), Some(rule.name)))
        .unwrap_or((AppType::Unknown, String::new(), None))
}
