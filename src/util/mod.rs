//! Utility modules for circle-migrate

pub mod logging;

pub use logging::{init_from_env, init_logging, level_from_flags, parse_level, LoggingConfig};
