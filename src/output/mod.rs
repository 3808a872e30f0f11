pub mod schema;

pub use schema::{assemble, BuildJob, Jobs, NewConfig, CONFIG_VERSION};
