use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

define_id_enum! {
    /// Primary language/framework category of the repository
    AppType {
        Go => "go" : "Go" | "golang",
        Node => "node" : "Node.js" | "nodejs",
        /// Go service with a swagger.yml, built by wag (Go plus generated Node clients)
        Wag => "wag" : "Wag (Go + Node)",
        Python => "python" : "Python",
        Unknown => "unknown" : "Unknown",
    }
}

define_id_enum! {
    /// Data store a test suite needs running alongside the build container
    DatabaseType {
        Postgresql => "postgresql" : "PostgreSQL" | "postgres",
        Mongo => "mongo" : "MongoDB" | "mongodb",
        Redis => "redis" : "Redis",
    }
}

impl AppType {
    /// Whether the app lives under GOPATH on the 2.0 image
    pub fn is_go_rooted(&self) -> bool {
        matches!(self, AppType::Go | AppType::Wag)
    }
}

/// Everything image selection depends on, computed once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConstraints {
    pub app_type: AppType,
    /// Runtime version, e.g. "1.10" for go or "8" for node; empty when unknown
    pub version: String,
    pub database_types: BTreeSet<DatabaseType>,
}

impl ImageConstraints {
    pub fn new(app_type: AppType, version: impl Into<String>) -> Self {
        Self {
            app_type,
            version: version.into(),
            database_types: BTreeSet::new(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(AppType::Unknown, "")
    }

    pub fn with_database(mut self, database: DatabaseType) -> Self {
        self.database_types.insert(database);
        self
    }

    pub fn uses(&self, database: DatabaseType) -> bool {
        self.database_types.contains(&database)
    }
}
