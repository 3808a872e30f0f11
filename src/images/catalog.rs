//! Image tables and resolution
//!
//! Resolution is a pure lookup: the same constraints always produce the same
//! image list, in the same order.

use crate::detection::{AppType, DatabaseType, ImageConstraints};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Reproduces the CircleCI 1.0 build machine
pub const DEFAULT_IMAGE: &str = "circleci/build-image:ubuntu-14.04-XXL-upstart-1189-5614f37";

/// Suffix of the CircleCI go images that also ship node
const NODE_VARIANT_SUFFIX: &str = "-node";

/// One entry of the job's `docker` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerImage {
    pub image: String,
}

impl DockerImage {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
        }
    }
}

/// Primary image followed by one image per auxiliary data store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedImages {
    pub primary: DockerImage,
    pub auxiliary: Vec<DockerImage>,
}

impl ResolvedImages {
    /// Primary first, then auxiliary images in order
    pub fn all(&self) -> Vec<DockerImage> {
        std::iter::once(self.primary.clone())
            .chain(self.auxiliary.iter().cloned())
            .collect()
    }
}

/// Version-keyed image tables per application type
#[derive(Debug, Clone)]
pub struct ImageCatalog {
    go: BTreeMap<String, String>,
    node: BTreeMap<String, String>,
    python: BTreeMap<String, String>,
    services: BTreeMap<DatabaseType, String>,
    default_image: String,
}

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for ImageCatalog {
    fn default() -> Self {
        Self {
            go: table(&[
                ("1.10", "circleci/golang:1.10.3-stretch"),
                ("1.9", "circleci/golang:1.9.7-stretch"),
                ("1.8", "circleci/golang:1.8.7-stretch"),
            ]),
            // Node < 6 has no CircleCI image; those apps run on 6.
            node: table(&[
                ("10", "circleci/node:10.8.0-stretch"),
                ("8", "circleci/node:8.11.3-stretch"),
                ("6", "circleci/node:6.14.3-stretch"),
                ("5", "circleci/node:6.14.3-stretch"),
                ("4", "circleci/node:6.14.3-stretch"),
                ("0", "circleci/node:6.14.3-stretch"),
            ]),
            python: table(&[("2.7", "circleci/python:2.7.15")]),
            services: [
                (DatabaseType::Postgresql, "circleci/postgres:9.4-alpine-ram"),
                (DatabaseType::Mongo, "circleci/mongo:3.2.20-jessie-ram"),
                (
                    DatabaseType::Redis,
                    "redis@sha256:858b1677143e9f8455821881115e276f6177221de1c663d0abef9b2fda02d065",
                ),
            ]
            .into_iter()
            .map(|(db, image)| (db, image.to_string()))
            .collect(),
            default_image: DEFAULT_IMAGE.to_string(),
        }
    }
}

impl ImageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service_image(mut self, database: DatabaseType, image: impl Into<String>) -> Self {
        self.services.insert(database, image.into());
        self
    }

    pub fn without_service_image(mut self, database: DatabaseType) -> Self {
        self.services.remove(&database);
        self
    }

    pub fn with_default_image(mut self, image: impl Into<String>) -> Self {
        self.default_image = image.into();
        self
    }

    pub fn default_image(&self) -> DockerImage {
        DockerImage::new(self.default_image.clone())
    }

    fn lookup(&self, app_type: AppType, version: &str) -> Option<String> {
        match app_type {
            AppType::Go => self.go.get(version).cloned(),
            // TODO: circleci/golang has no -node variant for 1.8; wag apps pinned there get a missing image.
            AppType::Wag => self
                .go
                .get(version)
                .map(|image| format!("{}{}", image, NODE_VARIANT_SUFFIX)),
            AppType::Node => {
                let image = self.node.get(version).cloned();
                if image.is_none() {
                    warn!(version, "Unrecognized node version");
                }
                image
            }
            AppType::Python => self.python.get(version).cloned(),
            AppType::Unknown => None,
        }
    }

    /// Base image for the app, or the 1.0-compatible default
    pub fn primary_image(&self, constraints: &ImageConstraints) -> DockerImage {
        match self.lookup(constraints.app_type, &constraints.version) {
            Some(image) => {
                debug!(image = %image, "Selected primary image");
                DockerImage::new(image)
            }
            None => {
                warn!(
                    app_type = %constraints.app_type,
                    version = %constraints.version,
                    default = %self.default_image,
                    "No CircleCI image for app type and version, using default"
                );
                self.default_image()
            }
        }
    }

    pub fn service_image(&self, database: DatabaseType) -> Option<DockerImage> {
        self.services.get(&database).cloned().map(DockerImage::new)
    }

    /// One image per detected data store; stores without an image are skipped
    pub fn service_images(&self, constraints: &ImageConstraints) -> Vec<DockerImage> {
        constraints
            .database_types
            .iter()
            .filter_map(|database| {
                let image = self.service_image(*database);
                if image.is_none() {
                    warn!(database = %database, "Cannot find database image, skipping");
                }
                image
            })
            .collect()
    }

    pub fn resolve(&self, constraints: &ImageConstraints) -> ResolvedImages {
        ResolvedImages {
            primary: self.primary_image(constraints),
            auxiliary: self.service_images(constraints),
        }
    }
}
