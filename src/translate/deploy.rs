//! Deployment section translation
//!
//! 1.0 keyed deploy commands by branch selector; 2.0 has a single build job, so
//! each command becomes a run step guarded by a `CIRCLE_BRANCH` test. Commands
//! listed under both `master` and `non-master` run on every branch and are
//! emitted once, unguarded, ahead of everything else.

use super::{BuildStep, TranslateError};
use crate::legacy::DeploymentSettings;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

crate::define_id_enum! {
    /// Branch selector keys accepted in the `deployment` map
    DeploySelector {
        Master => "master" : "master branch",
        NonMaster => "non-master" : "every branch except master",
        All => "all" : "all branches",
    }
}

/// Rejects any `deployment` key outside [`DeploySelector`]
pub fn validate_keys(
    deployment: &BTreeMap<String, DeploymentSettings>,
) -> Result<(), TranslateError> {
    for key in deployment.keys() {
        if DeploySelector::from_name(key).is_none() {
            return Err(TranslateError::InvalidDeploymentKey(key.clone()));
        }
    }
    Ok(())
}

fn guarded(test: &str, command: &str) -> String {
    format!("if [ \"${{CIRCLE_BRANCH}}\" {} ]; then {}; fi;", test, command)
}

pub fn non_master_guard(command: &str) -> String {
    guarded("!= \"master\"", command)
}

pub fn master_guard(command: &str) -> String {
    guarded("== \"master\"", command)
}

pub fn branch_guard(branch: &str, command: &str) -> String {
    guarded(&format!("== \"{}\"", branch), command)
}

/// Commands present in both lists, in `master` order, each listed once
fn overlapping<'a>(master: &'a [String], non_master: &[String]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    master
        .iter()
        .filter(|command| non_master.contains(command))
        .filter(|command| seen.insert(command.as_str()))
        .map(String::as_str)
        .collect()
}

/// Translates the `deployment` map into run steps
///
/// Emission order is overlap, then `non-master`, then `master`, then `all`.
pub fn deploy_steps(
    deployment: &BTreeMap<String, DeploymentSettings>,
) -> Result<Vec<BuildStep>, TranslateError> {
    validate_keys(deployment)?;

    let settings = |selector: DeploySelector| deployment.get(selector.as_str());
    let master = settings(DeploySelector::Master);
    let non_master = settings(DeploySelector::NonMaster);
    let all = settings(DeploySelector::All);

    let overlap = match (master, non_master) {
        (Some(master), Some(non_master)) => overlapping(&master.commands, &non_master.commands),
        _ => Vec::new(),
    };
    if !overlap.is_empty() {
        debug!(
            count = overlap.len(),
            "Deploy commands shared by master and non-master run unconditionally"
        );
    }

    let mut steps: Vec<BuildStep> = overlap.iter().map(|c| BuildStep::run(*c)).collect();

    if let Some(non_master) = non_master {
        steps.extend(
            non_master
                .commands
                .iter()
                .filter(|c| !overlap.contains(&c.as_str()))
                .map(|c| BuildStep::run(non_master_guard(c))),
        );
    }

    if let Some(master) = master {
        steps.extend(
            master
                .commands
                .iter()
                .filter(|c| !overlap.contains(&c.as_str()))
                .map(|c| BuildStep::run(master_guard(c))),
        );
    }

    if let Some(all) = all {
        steps.extend(all.commands.iter().map(|c| {
            if all.branch.is_empty() {
                BuildStep::run(c.as_str())
            } else {
                BuildStep::run(branch_guard(&all.branch, c))
            }
        }));
    }

    Ok(steps)
}
