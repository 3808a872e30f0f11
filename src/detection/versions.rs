//! Runtime version lookups
//!
//! Versions come from conventions in Clever-style Makefiles first, then from
//! other files in the repository, then from fixed defaults.

use super::DetectionInputs;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info};

pub const DEFAULT_GO_VERSION: &str = "1.10";
pub const DEFAULT_NODE_VERSION: &str = "8";
pub const DEFAULT_PYTHON_VERSION: &str = "2.7";

fn go_version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // $(eval $(call golang-version-check,1.10))
    RE.get_or_init(|| Regex::new(r"golang-version-check,([0-1].[0-9]+)").expect("valid regex"))
}

fn makefile_node_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"NODE_VERSION := "v([0-9]+)""#).expect("valid regex"))
}

fn dockerfile_node_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[a-z]*/?node[a-z]*:([0-9]+)").expect("valid regex"))
}

fn legacy_node_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"version:[ ]*([0-9])").expect("valid regex"))
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Go version from the Makefile's version check, defaulting to 1.10
pub fn go_version(makefile: &str) -> String {
    match first_capture(go_version_regex(), makefile) {
        Some(version) => {
            debug!(version = %version, "Found go version in Makefile");
            version
        }
        None => DEFAULT_GO_VERSION.to_string(),
    }
}

/// Node major version, looked up in priority order:
/// Makefile `NODE_VERSION`, Dockerfile base image, circle.yml machine version,
/// then the default.
pub fn node_version(inputs: &DetectionInputs<'_>) -> String {
    if let Some(version) = first_capture(makefile_node_regex(), inputs.makefile()) {
        debug!(version = %version, "Found node version in Makefile");
        return version;
    }

    match inputs.read("Dockerfile") {
        Ok(dockerfile) => {
            debug!("Checking node version in Dockerfile");
            if let Some(version) = first_capture(dockerfile_node_regex(), &dockerfile) {
                return version;
            }
        }
        Err(e) => info!("Could not read Dockerfile: {:#}", e),
    }

    debug!("Checking node version in circle.yml");
    if let Some(version) = first_capture(legacy_node_regex(), inputs.legacy_raw) {
        return version;
    }

    info!(
        version = DEFAULT_NODE_VERSION,
        "Using default node version"
    );
    DEFAULT_NODE_VERSION.to_string()
}
