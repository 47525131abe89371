use std::fmt;

use serde::{Deserialize, Serialize};

/// How validation failures are treated in the generated server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    Strict,
    Warn,
    Disabled,
}

/// Digest algorithm for conditional-request ETags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EtagAlgorithm {
    Sha256,
    Md5,
}

/// Where the requested schema version is negotiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStrategy {
    Header,
    Url,
    Both,
}

/// Event bus backend wired into the generated server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventBusKind {
    Memory,
    Nats,
    Kafka,
}

/// Storage backend the pipeline generates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    File,
    Ent,
}

/// Database driver for the entity storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbDriver {
    Postgres,
    Mysql,
    Sqlite,
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValidationMode::Strict => "strict",
            ValidationMode::Warn => "warn",
            ValidationMode::Disabled => "disabled",
        })
    }
}

impl fmt::Display for EtagAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EtagAlgorithm::Sha256 => "sha256",
            EtagAlgorithm::Md5 => "md5",
        })
    }
}

impl fmt::Display for VersionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VersionStrategy::Header => "header",
            VersionStrategy::Url => "url",
            VersionStrategy::Both => "both",
        })
    }
}

impl fmt::Display for EventBusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EventBusKind::Memory => "memory",
            EventBusKind::Nats => "nats",
            EventBusKind::Kafka => "kafka",
        })
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageKind::File => "file",
            StorageKind::Ent => "ent",
        })
    }
}

impl fmt::Display for DbDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DbDriver::Postgres => "postgres",
            DbDriver::Mysql => "mysql",
            DbDriver::Sqlite => "sqlite",
        })
    }
}

/// Configuration values for code generation.
///
/// Passed to templates and used to gate conditional pipeline stages.
/// Mutated via the [`crate::Generator`] setters before a run; read-only
/// during generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GeneratorConfig {
    pub validation_enabled: bool,
    pub validation_mode: ValidationMode,

    pub conditional_enabled: bool,
    #[serde(rename = "ETagAlgorithm")]
    pub etag_algorithm: EtagAlgorithm,

    pub versioning_enabled: bool,
    pub version_strategy: VersionStrategy,

    pub events_enabled: bool,
    pub event_bus_type: EventBusKind,

    pub storage_type: StorageKind,
    #[serde(rename = "DBDriver")]
    pub db_driver: DbDriver,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            validation_enabled: true,
            validation_mode: ValidationMode::Strict,
            conditional_enabled: true,
            etag_algorithm: EtagAlgorithm::Sha256,
            versioning_enabled: true,
            version_strategy: VersionStrategy::Header,
            events_enabled: false,
            event_bus_type: EventBusKind::Memory,
            storage_type: StorageKind::File,
            db_driver: DbDriver::Sqlite,
        }
    }
}
