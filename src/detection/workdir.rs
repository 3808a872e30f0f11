//! Working directory of the 2.0 build job

use super::AppType;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Last path segment of a checkout made by microplane
const MICROPLANE_SEGMENT: &str = "planned";

/// How far up a microplane checkout the repository name sits
const MICROPLANE_DEPTH: usize = 3;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WorkdirError {
    #[error("Failed to find repository name in {0}")]
    NoRepositoryName(PathBuf),
}

/// Repository name from the checkout path
pub fn repository_name(repo_path: &Path) -> Result<String, WorkdirError> {
    let segments: Vec<String> = repo_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();

    let missing = || WorkdirError::NoRepositoryName(repo_path.to_path_buf());
    let last = segments.last().ok_or_else(missing)?;

    if last == MICROPLANE_SEGMENT {
        return segments
            .len()
            .checked_sub(MICROPLANE_DEPTH)
            .and_then(|i| segments.get(i))
            .cloned()
            .ok_or_else(missing);
    }

    Ok(last.clone())
}

/// Go apps must sit under GOPATH; everything else goes under the home directory
pub fn working_directory(
    app_type: AppType,
    repo_path: &Path,
    org: &str,
) -> Result<String, WorkdirError> {
    let repo = repository_name(repo_path)?;

    Ok(if app_type.is_go_rooted() {
        format!("/go/src/github.com/{}/{}", org, repo)
    } else {
        format!("~/{}/{}", org, repo)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_name() {
        assert_eq!(
            repository_name(Path::new("/home/ubuntu/catapult")).unwrap(),
            "catapult"
        );
        assert_eq!(repository_name(Path::new("hubble/")).unwrap(), "hubble");
    }

    #[test]
    fn test_repository_name_microplane() {
        assert_eq!(
            repository_name(Path::new("/work/mp/catapult/clone/planned")).unwrap(),
            "catapult"
        );
        assert_eq!(
            repository_name(Path::new("mp/hubble/x/planned")).unwrap(),
            "hubble"
        );
    }

    #[test]
    fn test_repository_name_errors() {
        assert_eq!(
            repository_name(Path::new("/")),
            Err(WorkdirError::NoRepositoryName(PathBuf::from("/")))
        );
        assert!(repository_name(Path::new("/x/planned")).is_err());
    }

    #[test]
    fn test_working_directory_by_app_type() {
        let repo = Path::new("/src/catapult");

        assert_eq!(
            working_directory(AppType::Go, repo, "Clever").unwrap(),
            "/go/src/github.com/Clever/catapult"
        );
        assert_eq!(
            working_directory(AppType::Wag, repo, "Clever").unwrap(),
            "/go/src/github.com/Clever/catapult"
        );
        assert_eq!(
            working_directory(AppType::Node, repo, "Clever").unwrap(),
            "~/Clever/catapult"
        );
        assert_eq!(
            working_directory(AppType::Unknown, repo, "acme").unwrap(),
            "~/acme/catapult"
        );
    }
}
