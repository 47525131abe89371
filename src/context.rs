//! Template input records.
//!
//! The serialized attribute names of these structs are part of the external
//! contract: template sources reference them directly. Contexts are built per
//! emission and discarded once the template has executed.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;

use crate::config::{
    DbDriver, EtagAlgorithm, EventBusKind, GeneratorConfig, StorageKind, ValidationMode,
    VersionStrategy,
};
use crate::generator::Generator;
use crate::introspect::SpecField;
use crate::metadata::{ResourceMetadata, SchemaVersion};

/// Context for templates executed once per registered resource.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceContext {
    pub name: String,
    pub plural_name: String,
    pub package: String,
    pub package_alias: String,
    pub type_name: String,
    pub spec_type: String,
    pub status_type: String,
    #[serde(rename = "URLPath")]
    pub url_path: String,
    pub storage_name: String,
    pub tags: BTreeMap<String, String>,
    pub per_resource_versioning: bool,
    pub spec_fields: Vec<SpecField>,
    pub status_fields: Vec<SpecField>,
    pub versions: Vec<SchemaVersion>,
    pub default_version: String,
    #[serde(rename = "APIGroupVersion")]
    pub api_group_version: String,
    pub module_path: String,
    pub version: String,
    pub generated_at: String,
    pub template: String,
}

/// Context for templates that process the whole registry at once
/// (models, routes, registration files, ...).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalContext {
    pub package_name: String,
    pub module_path: String,
    pub resources: Vec<ResourceMetadata>,
    pub project_name: String,
    pub storage_type: StorageKind,
    #[serde(rename = "DBDriver")]
    pub db_driver: DbDriver,
    pub config: GeneratorConfig,
    pub version: String,
    pub generated_at: String,
    pub template: String,
}

/// Context for middleware templates, driven by configuration only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MiddlewareContext {
    pub validation_mode: ValidationMode,
    pub validation_enabled: bool,
    #[serde(rename = "ETagAlgorithm")]
    pub etag_algorithm: EtagAlgorithm,
    pub version_strategy: VersionStrategy,
    pub event_bus_type: EventBusKind,
    pub events_enabled: bool,
    pub version: String,
    pub generated_at: String,
    pub template: String,
}

/// Minimal context for templates executed without resource or config data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StampContext {
    pub version: String,
    pub generated_at: String,
    pub template: String,
}

fn generated_at() -> String {
    Utc::now().to_rfc3339()
}

/// Derive a project name from the module path: the last slash-separated
/// segment with `-` and `.` replaced by `_`, suitable for identifiers and
/// environment variable stems.
pub(crate) fn project_name(module_path: &str) -> String {
    let last = module_path.rsplit('/').next().unwrap_or("");
    if last.is_empty() {
        return "app".to_string();
    }
    last.replace('-', "_").replace('.', "_")
}

impl Generator {
    pub(crate) fn resource_context(
        &self,
        resource: &ResourceMetadata,
        template: &str,
    ) -> ResourceContext {
        ResourceContext {
            name: resource.name.clone(),
            plural_name: resource.plural_name.clone(),
            package: resource.package.clone(),
            package_alias: resource.package_alias.clone(),
            type_name: resource.type_name.clone(),
            spec_type: resource.spec_type.clone(),
            status_type: resource.status_type.clone(),
            url_path: resource.url_path.clone(),
            storage_name: resource.storage_name.clone(),
            tags: resource.tags.clone(),
            per_resource_versioning: resource.per_resource_versioning(),
            spec_fields: resource.spec_fields.clone(),
            status_fields: resource.status_fields.clone(),
            versions: resource.versions.clone(),
            default_version: resource.default_version.clone(),
            api_group_version: resource.api_group_version.clone(),
            module_path: self.module_path.clone(),
            version: self.version.clone(),
            generated_at: generated_at(),
            template: template.to_string(),
        }
    }

    pub(crate) fn global_context(&self, template: &str) -> GlobalContext {
        GlobalContext {
            package_name: self.package_name.clone(),
            module_path: self.module_path.clone(),
            resources: self.resources.clone(),
            project_name: project_name(&self.module_path),
            storage_type: self.config.storage_type,
            db_driver: self.config.db_driver,
            config: self.config.clone(),
            version: self.version.clone(),
            generated_at: generated_at(),
            template: template.to_string(),
        }
    }

    pub(crate) fn middleware_context(&self, template: &str) -> MiddlewareContext {
        MiddlewareContext {
            validation_mode: self.config.validation_mode,
            validation_enabled: self.config.validation_enabled,
            etag_algorithm: self.config.etag_algorithm,
            version_strategy: self.config.version_strategy,
            event_bus_type: self.config.event_bus_type,
            events_enabled: self.config.events_enabled,
            version: self.version.clone(),
            generated_at: generated_at(),
            template: template.to_string(),
        }
    }

    pub(crate) fn stamp_context(&self, template: &str) -> StampContext {
        StampContext {
            version: self.version.clone(),
            generated_at: generated_at(),
            template: template.to_string(),
        }
    }
}
