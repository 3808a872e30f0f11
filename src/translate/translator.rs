use super::{deploy, phases::phase_steps, setup, BuildStep, TranslateError};
use crate::detection::{AppType, DatabaseType, ImageConstraints};
use crate::images::{DockerImage, ImageCatalog};
use crate::legacy::LegacyConfig;
use tracing::{debug, info, warn};

/// Oldest node major the 2.0 images were validated against
const MIN_SUPPORTED_NODE: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    pub ci_scripts_url: String,
    /// Whether the repository ships an `.npmrc_docker` credentials template
    pub has_npmrc_template: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            ci_scripts_url: setup::DEFAULT_CI_SCRIPTS_URL.to_string(),
            has_npmrc_template: false,
        }
    }
}

/// Output of one translation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    pub steps: Vec<BuildStep>,
    /// Service containers requested through `machine.services`
    pub service_images: Vec<DockerImage>,
}

pub struct Translator<'a> {
    catalog: &'a ImageCatalog,
    options: TranslateOptions,
}

impl<'a> Translator<'a> {
    pub fn new(catalog: &'a ImageCatalog, options: TranslateOptions) -> Self {
        Self { catalog, options }
    }

    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    pub fn translate(
        &self,
        legacy: &LegacyConfig,
        constraints: &ImageConstraints,
    ) -> Result<Translation, TranslateError> {
        // Fail before building anything so a bad key never yields partial output
        deploy::validate_keys(&legacy.deployment)?;

        let mut translation = Translation::default();
        self.bootstrap(legacy, &mut translation);
        self.app_steps(constraints, &mut translation.steps);

        for (phase_name, phase) in [
            ("dependencies", &legacy.dependencies),
            ("compile", &legacy.compile),
            ("test", &legacy.test),
        ] {
            let before = translation.steps.len();
            translation.steps.extend(phase_steps(phase));
            debug!(
                phase = phase_name,
                steps = translation.steps.len() - before,
                "Translated phase"
            );
        }

        translation.steps.push(setup::install_awscli());
        translation
            .steps
            .extend(deploy::deploy_steps(&legacy.deployment)?);

        info!(
            steps = translation.steps.len(),
            service_images = translation.service_images.len(),
            "Translated legacy configuration"
        );
        Ok(translation)
    }

    fn bootstrap(&self, legacy: &LegacyConfig, translation: &mut Translation) {
        translation
            .steps
            .push(setup::clone_ci_scripts(&self.options.ci_scripts_url));
        translation.steps.push(setup::checkout());

        let services = setup::machine_services(&legacy.machine.services, self.catalog);
        translation.steps.extend(services.steps);
        translation.service_images.extend(services.images);

        translation.steps.push(setup::create_artifact_dirs());

        if self.options.has_npmrc_template {
            debug!("Found {}, adding .npmrc setup", setup::NPMRC_TEMPLATE);
            translation.steps.push(setup::setup_npmrc());
        }
    }

    fn app_steps(&self, constraints: &ImageConstraints, steps: &mut Vec<BuildStep>) {
        if constraints.app_type == AppType::Node {
            steps.push(setup::npm_install());
            match constraints.version.parse::<u32>() {
                Err(_) => warn!(version = %constraints.version, "Invalid node version"),
                Ok(major) if major < MIN_SUPPORTED_NODE => warn!(
                    version = major,
                    "Legacy node version, the build may need manual changes"
                ),
                Ok(_) => {}
            }
        }

        if constraints.uses(DatabaseType::Postgresql) {
            steps.push(setup::install_psql());
            steps.push(setup::wait_for_postgres());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::DeploymentSettings;

    const GO_SERVICE: &str = r#"
machine:
  services:
    - docker
compile:
  override:
    - make build
test:
  override:
    - make test
deployment:
  master:
    branch: master
    commands:
      - make publish
"#;

    fn translate(yaml: &str, constraints: &ImageConstraints) -> Result<Translation, TranslateError> {
        let catalog = ImageCatalog::default();
        let legacy = LegacyConfig::from_yaml(yaml).unwrap();
        Translator::new(&catalog, TranslateOptions::default()).translate(&legacy, constraints)
    }

    #[test]
    fn test_go_service_steps() {
        let translation = translate(GO_SERVICE, &ImageConstraints::new(AppType::Go, "1.10")).unwrap();
        let steps = &translation.steps;

        assert_eq!(steps[0].name(), Some("Clone ci-scripts"));
        assert_eq!(steps[1], BuildStep::directive("checkout"));
        assert_eq!(steps[2], BuildStep::directive("setup_remote_docker"));
        assert_eq!(steps[3].name(), Some("Set up CircleCI artifacts directories"));
        assert_eq!(steps[4], BuildStep::run("make build"));
        assert_eq!(steps[5], BuildStep::run("make test"));
        assert_eq!(steps[6].name(), Some("Install awscli for ECR publish"));
        assert_eq!(
            steps[7],
            BuildStep::run(deploy::master_guard("make publish"))
        );
        assert_eq!(steps.len(), 8);
        assert!(translation.service_images.is_empty());
    }

    #[test]
    fn test_node_and_postgres_steps() {
        let constraints =
            ImageConstraints::new(AppType::Node, "8").with_database(DatabaseType::Postgresql);
        let translation = translate("", &constraints).unwrap();
        let names: Vec<_> = translation.steps.iter().filter_map(BuildStep::name).collect();

        assert_eq!(
            names,
            vec![
                "Clone ci-scripts",
                "checkout",
                "Set up CircleCI artifacts directories",
                "npm install",
                "Install psql",
                "Wait for postgres database to be ready",
                "Install awscli for ECR publish",
            ]
        );
    }

    #[test]
    fn test_no_postgres_no_psql() {
        let translation = translate("", &ImageConstraints::new(AppType::Go, "1.9")).unwrap();
        assert!(translation
            .steps
            .iter()
            .all(|s| s.name() != Some("Install psql")));
    }

    #[test]
    fn test_legacy_node_still_translates() {
        let translation = translate("", &ImageConstraints::new(AppType::Node, "4")).unwrap();
        assert!(translation.steps.contains(&setup::npm_install()));

        let translation = translate("", &ImageConstraints::new(AppType::Node, "lts")).unwrap();
        assert!(translation.steps.contains(&setup::npm_install()));
    }

    #[test]
    fn test_npmrc_step_when_template_present() {
        let catalog = ImageCatalog::default();
        let options = TranslateOptions {
            has_npmrc_template: true,
            ..Default::default()
        };
        let translation = Translator::new(&catalog, options)
            .translate(&LegacyConfig::default(), &ImageConstraints::unknown())
            .unwrap();

        assert_eq!(translation.steps[3].name(), Some("Set up CircleCI artifacts directories"));
        assert_eq!(translation.steps[4], setup::setup_npmrc());
    }

    #[test]
    fn test_redis_machine_service() {
        let yaml = "machine:\n  services:\n    - redis\n";
        let translation = translate(yaml, &ImageConstraints::unknown()).unwrap();

        assert_eq!(translation.service_images.len(), 1);
        assert!(!translation
            .steps
            .contains(&BuildStep::directive("setup_remote_docker")));
    }

    #[test]
    fn test_invalid_deploy_key_fails() {
        let mut legacy = LegacyConfig::from_yaml(GO_SERVICE).unwrap();
        legacy
            .deployment
            .insert("production".to_string(), DeploymentSettings::default());

        let catalog = ImageCatalog::default();
        let result = Translator::new(&catalog, TranslateOptions::default())
            .translate(&legacy, &ImageConstraints::new(AppType::Go, "1.10"));
        assert!(matches!(
            result,
            Err(TranslateError::InvalidDeploymentKey(key)) if key == "production"
        ));
    }

    #[test]
    fn test_custom_ci_scripts_url() {
        let catalog = ImageCatalog::default();
        let options = TranslateOptions {
            ci_scripts_url: "git@example.com:ci.git".to_string(),
            ..Default::default()
        };
        let translation = Translator::new(&catalog, options)
            .translate(&LegacyConfig::default(), &ImageConstraints::unknown())
            .unwrap();

        assert!(translation.steps[0]
            .command()
            .unwrap()
            .contains("git@example.com:ci.git"));
    }
}
