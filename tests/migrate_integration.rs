//! Migration pipeline against real repositories on disk

mod support;

use circle_migrate::migrate::{OUTPUT_DIR, OUTPUT_FILE};
use circle_migrate::{
    AppType, BuildStep, DatabaseType, MigrateConfig, MigrateOptions, MigrationError, Migrator,
    NewConfig, RealFileSystem, WalkScanner,
};
use std::fs;
use support::checkout_fixture;
use yare::parameterized;

fn config() -> MigrateConfig {
    MigrateConfig {
        org: "Clever".to_string(),
        log_level: "info".to_string(),
        scan_backend: "builtin".to_string(),
        ci_scripts_url: "https://github.com/Clever/ci-scripts.git".to_string(),
    }
}

#[parameterized(
    go_postgres = { "go-postgres", AppType::Go, "1.9", "circleci/golang:1.9.7-stretch", "/go/src/github.com/Clever/go-postgres" },
    node_mongo = { "node-mongo", AppType::Node, "6", "circleci/node:6.14.3-stretch", "~/Clever/node-mongo" },
    wag_service = { "wag-service", AppType::Wag, "1.10", "circleci/golang:1.10.3-stretch-node", "/go/src/github.com/Clever/wag-service" },
    python_lint = { "python-lint", AppType::Python, "2.7", "circleci/python:2.7.15", "~/Clever/python-lint" },
)]
fn test_fixture_detection(
    fixture: &str,
    app_type: AppType,
    version: &str,
    primary: &str,
    working_directory: &str,
) {
    let (_dir, repo) = checkout_fixture(fixture);
    let fs = RealFileSystem;
    let scanner = WalkScanner::new();

    let plan = Migrator::new(&fs, &scanner, config()).plan(&repo).unwrap();

    assert_eq!(plan.report.constraints.app_type, app_type);
    assert_eq!(plan.report.constraints.version, version);
    assert_eq!(plan.config.build().docker[0].image, primary);
    assert_eq!(plan.config.build().working_directory, working_directory);
}

#[test]
fn test_go_postgres_migration_writes_config() {
    let (_dir, repo) = checkout_fixture("go-postgres");
    let fs = RealFileSystem;
    let scanner = WalkScanner::new();

    let outcome = Migrator::new(&fs, &scanner, config())
        .migrate(&repo, &MigrateOptions::default())
        .unwrap();

    let written = repo.join(OUTPUT_DIR).join(OUTPUT_FILE);
    assert_eq!(outcome.written.as_deref(), Some(written.as_path()));
    assert!(!repo.join("circle.yml").exists());
    assert!(repo.join("circle.yml.bak").is_file());

    let config = NewConfig::from_yaml(&fs::read_to_string(&written).unwrap()).unwrap();
    let build = config.build();
    let images: Vec<&str> = build.docker.iter().map(|d| d.image.as_str()).collect();
    assert_eq!(
        images,
        vec!["circleci/golang:1.9.7-stretch", "circleci/postgres:9.4-alpine-ram"]
    );

    let names: Vec<&str> = build.steps.iter().filter_map(BuildStep::name).collect();
    assert!(names.contains(&"setup_remote_docker"));
    assert!(names.contains(&"Install psql"));
    assert!(names.contains(&"Wait for postgres database to be ready"));

    let commands: Vec<&str> = build.steps.iter().filter_map(BuildStep::command).collect();
    let deploy: Vec<&str> = commands
        .iter()
        .copied()
        .filter(|c| c.contains("ci-scripts/circleci/"))
        .collect();
    assert_eq!(deploy.len(), 2);
    assert!(deploy[0].starts_with("$HOME/ci-scripts/circleci/docker-publish"));
    assert_eq!(
        deploy[1],
        r#"if [ "${CIRCLE_BRANCH}" == "master" ]; then $HOME/ci-scripts/circleci/catapult-publish $CATAPULT_URL $CATAPULT_USER $CATAPULT_PASS $APP_NAME; fi;"#
    );

    assert_eq!(outcome.plan.untranslated, vec!["machine.post"]);
}

#[test]
fn test_vendor_and_generated_dirs_are_not_scanned() {
    let (_dir, repo) = checkout_fixture("go-postgres");
    let fs = RealFileSystem;
    let scanner = WalkScanner::new();

    let report = Migrator::new(&fs, &scanner, config()).detect(&repo).unwrap();

    assert!(report.constraints.uses(DatabaseType::Postgresql));
    assert!(!report.constraints.uses(DatabaseType::Mongo));
}

#[test]
fn test_node_mongo_with_redis_and_npmrc() {
    let (_dir, repo) = checkout_fixture("node-mongo");
    let fs = RealFileSystem;
    let scanner = WalkScanner::new();

    let plan = Migrator::new(&fs, &scanner, config()).plan(&repo).unwrap();
    let build = plan.config.build();

    let images: Vec<&str> = build.docker.iter().map(|d| d.image.as_str()).collect();
    assert_eq!(images.len(), 3);
    assert_eq!(images[1], "circleci/mongo:3.2.20-jessie-ram");
    assert!(images[2].starts_with("redis@sha256:"));

    let names: Vec<&str> = build.steps.iter().filter_map(BuildStep::name).collect();
    assert_eq!(
        &names[..5],
        &[
            "Clone ci-scripts",
            "checkout",
            "Set up CircleCI artifacts directories",
            "Set up .npmrc",
            "npm install",
        ]
    );
    assert!(!names.contains(&"Install psql"));

    assert_eq!(
        build.steps.last(),
        Some(&BuildStep::run(
            r#"if [ "${CIRCLE_BRANCH}" == "release" ]; then ./scripts/release.sh; fi;"#
        ))
    );
    assert_eq!(plan.untranslated, vec!["general.build_dir"]);
}

#[test]
fn test_identical_deploy_lists_collapse() {
    let (_dir, repo) = checkout_fixture("wag-service");
    let fs = RealFileSystem;
    let scanner = WalkScanner::new();

    let plan = Migrator::new(&fs, &scanner, config()).plan(&repo).unwrap();
    let deploy: Vec<&BuildStep> = plan
        .config
        .build()
        .steps
        .iter()
        .filter(|s| s.command().map_or(false, |c| c.contains("deploy.sh")))
        .collect();

    assert_eq!(deploy, vec![&BuildStep::run("./deploy.sh")]);
}

#[test]
fn test_invalid_deploy_key_leaves_repository_untouched() {
    let (_dir, repo) = checkout_fixture("bad-deploy");
    let fs = RealFileSystem;
    let scanner = WalkScanner::new();

    let err = Migrator::new(&fs, &scanner, config())
        .migrate(&repo, &MigrateOptions::default())
        .unwrap_err();

    assert!(matches!(err, MigrationError::Translate(_)));
    assert!(repo.join("circle.yml").is_file());
    assert!(!repo.join("circle.yml.bak").exists());
    assert!(!repo.join(OUTPUT_DIR).exists());
}

#[test]
fn test_second_run_reads_backup() {
    let (_dir, repo) = checkout_fixture("python-lint");
    let fs = RealFileSystem;
    let scanner = WalkScanner::new();
    let migrator = Migrator::new(&fs, &scanner, config());

    let first = migrator.migrate(&repo, &MigrateOptions::default()).unwrap();
    assert!(first.renamed.is_some());

    let second = migrator.migrate(&repo, &MigrateOptions::default()).unwrap();
    assert!(second.renamed.is_none());
    assert_eq!(first.plan.yaml, second.plan.yaml);
    assert!(repo.join("circle.yml.bak").is_file());
}
