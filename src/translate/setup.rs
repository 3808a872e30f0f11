//! Fixed setup steps the 2.0 job needs in place of 1.0 machine behaviour

use super::BuildStep;
use crate::detection::DatabaseType;
use crate::images::{DockerImage, ImageCatalog};
use tracing::{debug, warn};

pub const DEFAULT_CI_SCRIPTS_URL: &str = "https://github.com/Clever/ci-scripts.git";

/// Checkout directory under `$HOME`; deploy commands call `$HOME/ci-scripts/...`
pub const CI_SCRIPTS_DIR: &str = "ci-scripts";

/// Directories CircleCI 1.0 created automatically
pub const ARTIFACTS_DIR: &str = "/tmp/circleci-artifacts";
pub const TEST_REPORTS_DIR: &str = "/tmp/circleci-test-results";

/// Credential template that becomes `.npmrc` inside the build
pub const NPMRC_TEMPLATE: &str = ".npmrc_docker";

/// Attempts and interval of the postgres readiness loop
const POSTGRES_WAIT_ATTEMPTS: u32 = 10;
const POSTGRES_WAIT_INTERVAL_SECS: u32 = 1;
const POSTGRES_PORT: u16 = 5432;

pub fn clone_ci_scripts(url: &str) -> BuildStep {
    BuildStep::named(
        "Clone ci-scripts",
        format!(
            "cd $HOME && git clone --depth 1 -v {url} {dir} && cd {dir} && git show --oneline -s",
            url = url,
            dir = CI_SCRIPTS_DIR
        ),
    )
}

pub fn checkout() -> BuildStep {
    BuildStep::directive("checkout")
}

pub fn create_artifact_dirs() -> BuildStep {
    BuildStep::named(
        "Set up CircleCI artifacts directories",
        "mkdir -p $CIRCLE_ARTIFACTS $CIRCLE_TEST_REPORTS",
    )
}

pub fn setup_npmrc() -> BuildStep {
    BuildStep::named(
        "Set up .npmrc",
        format!(
            "sed -i.bak s/\\${{npm_auth_token}}/$NPM_TOKEN/ {template}\nmv {template} .npmrc",
            template = NPMRC_TEMPLATE
        ),
    )
}

pub fn npm_install() -> BuildStep {
    BuildStep::named("npm install", "npm install")
}

pub fn install_psql() -> BuildStep {
    BuildStep::named("Install psql", "sudo apt-get install postgresql")
}

pub fn wait_for_postgres() -> BuildStep {
    BuildStep::named(
        "Wait for postgres database to be ready",
        format!(
            "echo Waiting for postgres\n\
             for i in `seq 1 {attempts}`;\n\
             do\n  \
             nc -z localhost {port} && echo Success && exit 0\n  \
             echo -n .\n  \
             sleep {interval}\n\
             done\n\
             echo Failed waiting for postgres && exit 1",
            attempts = POSTGRES_WAIT_ATTEMPTS,
            port = POSTGRES_PORT,
            interval = POSTGRES_WAIT_INTERVAL_SECS,
        ),
    )
}

pub fn install_awscli() -> BuildStep {
    BuildStep::named(
        "Install awscli for ECR publish",
        "rm -rf ~/.local\n\
         cd /tmp/ && wget https://bootstrap.pypa.io/get-pip.py && sudo python get-pip.py\n\
         sudo apt-get update\n\
         sudo apt-get install python-dev\n\
         sudo pip install --upgrade awscli\n\
         aws --version",
    )
}

/// What `machine.services` turns into on 2.0
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineServices {
    pub steps: Vec<BuildStep>,
    pub images: Vec<DockerImage>,
    pub ignored: Vec<String>,
}

/// Docker becomes a remote docker engine, redis becomes a service container,
/// anything else is dropped with a warning
pub fn machine_services(services: &[String], catalog: &ImageCatalog) -> MachineServices {
    let mut translated = MachineServices::default();

    for service in services {
        match service.as_str() {
            "docker" => translated
                .steps
                .push(BuildStep::directive("setup_remote_docker")),
            "redis" => match catalog.service_image(DatabaseType::Redis) {
                Some(image) => {
                    debug!(image = %image.image, "Adding redis service container");
                    translated.images.push(image);
                }
                None => {
                    warn!("No redis image configured, ignoring machine service redis");
                    translated.ignored.push(service.clone());
                }
            },
            other => {
                warn!(service = other, "Ignoring machine.services item");
                translated.ignored.push(service.clone());
            }
        }
    }

    translated
}
