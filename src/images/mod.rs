//! Container image selection for the 2.0 build job

pub mod catalog;

pub use catalog::{DockerImage, ImageCatalog, ResolvedImages, DEFAULT_IMAGE};
