use serde::{Deserialize, Serialize};

/// One entry of the 2.0 job's `steps` list
///
/// Serializes to the three shapes CircleCI 2.0 accepts:
/// a bare directive (`- checkout`), a short run (`- run: make test`), or a
/// named run (`- run: {name: ..., command: ...}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BuildStep {
    Directive(String),
    Run { run: RunSpec },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunSpec {
    Command(String),
    Named { name: String, command: String },
}

impl BuildStep {
    pub fn directive(name: impl Into<String>) -> Self {
        BuildStep::Directive(name.into())
    }

    pub fn run(command: impl Into<String>) -> Self {
        BuildStep::Run {
            run: RunSpec::Command(command.into()),
        }
    }

    pub fn named(name: impl Into<String>, command: impl Into<String>) -> Self {
        BuildStep::Run {
            run: RunSpec::Named {
                name: name.into(),
                command: command.into(),
            },
        }
    }

    /// Shell text the step runs, if it runs any
    pub fn command(&self) -> Option<&str> {
        match self {
            BuildStep::Directive(_) => None,
            BuildStep::Run {
                run: RunSpec::Command(command),
            }
            | BuildStep::Run {
                run: RunSpec::Named { command, .. },
            } => Some(command.as_str()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            BuildStep::Directive(name)
            | BuildStep::Run {
                run: RunSpec::Named { name, .. },
            } => Some(name.as_str()),
            BuildStep::Run {
                run: RunSpec::Command(_),
            } => None,
        }
    }
}
