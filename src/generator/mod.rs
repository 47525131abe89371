//! The generator aggregate: resource registry, configuration and the
//! generation pipeline entry points.

mod format;
mod pipeline;

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::{DbDriver, GeneratorConfig, StorageKind};
use crate::descriptor::TypeDescriptor;
use crate::introspect::extract_fields;
use crate::metadata::{ResourceMetadata, SchemaVersion};
use crate::prefix;
use crate::templates::TemplateStore;

/// Errors raised by registry mutations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("version {version} already exists for resource {resource}")]
    VersionConflict { resource: String, version: String },
    #[error("resource {0} not found")]
    ResourceNotFound(String),
}

/// Handles code generation for resources.
///
/// The generator owns the resource registry, the template store and the
/// configuration; it is intended for single-owner use within one process
/// run. Templates must load before any pipeline stage runs, which
/// [`Generator::generate_all`] takes care of.
pub struct Generator {
    /// Directory most artifacts are written to; some sub-pipelines write
    /// to fixed paths instead (see the pipeline module)
    pub output_dir: PathBuf,
    /// Target package kind selector: `main`, `client` or `reconcile`
    pub package_name: String,
    /// Module path of the generated project (e.g. `github.com/example/app`)
    pub module_path: String,
    /// Registered resources, in registration order
    pub resources: Vec<ResourceMetadata>,
    /// Feature flags and knobs read by templates and stage gating
    pub config: GeneratorConfig,
    /// Print the source template name along with each emitted file
    pub verbose: bool,
    /// Tool version stamped into generated headers
    pub version: String,
    templates: Option<TemplateStore>,
}

impl Generator {
    /// Create a generator with the documented configuration defaults.
    pub fn new(
        output_dir: impl Into<PathBuf>,
        package_name: impl Into<String>,
        module_path: impl Into<String>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            package_name: package_name.into(),
            module_path: module_path.into(),
            resources: Vec::new(),
            config: GeneratorConfig::default(),
            verbose: false,
            version: env!("CARGO_PKG_VERSION").to_string(),
            templates: None,
        }
    }

    /// Set the storage backend the pipeline generates against.
    pub fn set_storage_kind(&mut self, kind: StorageKind) {
        self.config.storage_type = kind;
    }

    /// Set the database driver for the entity storage backend.
    pub fn set_db_driver(&mut self, driver: DbDriver) {
        self.config.db_driver = driver;
    }

    /// Override the tool version stamped into generated headers.
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Register a resource type for code generation.
    ///
    /// Derives the plural name, package alias and qualified type names and
    /// synthesizes the default `v1` schema version. Also seeds the
    /// process-wide identifier-prefix registry unless the user's resource
    /// module already registered a prefix for this kind.
    pub fn register_resource(&mut self, descriptor: &TypeDescriptor) {
        let name = descriptor.name.clone();
        let plural_name = format!("{}s", name.to_lowercase());
        let alias = package_alias(&descriptor.package);

        let spec_fields = extract_fields(descriptor, "Spec");
        let status_fields = extract_fields(descriptor, "Status");

        let type_name = format!("{alias}::{name}");
        let spec_type = format!("{alias}::{name}Spec");
        let status_type = format!("{alias}::{name}Status");

        let default_version = SchemaVersion {
            version: "v1".to_string(),
            is_default: true,
            stability: "stable".to_string(),
            deprecated: false,
            spec_type: spec_type.clone(),
            status_type: status_type.clone(),
            type_name: type_name.clone(),
            package: descriptor.package.clone(),
            transforms: Vec::new(),
        };

        prefix::seed_id_prefix(&name, &prefix::default_id_prefix(&name));

        self.resources.push(ResourceMetadata {
            name: name.clone(),
            plural_name: plural_name.clone(),
            package: descriptor.package.clone(),
            package_alias: alias,
            type_name,
            spec_type,
            status_type,
            url_path: format!("/{plural_name}"),
            storage_name: name,
            tags: BTreeMap::new(),
            spec_fields,
            status_fields,
            versions: vec![default_version],
            default_version: "v1".to_string(),
            api_group_version: "v1".to_string(),
        });
    }

    /// Set a tag key/value on a registered resource by name.
    /// If the resource isn't found, this is a no-op.
    pub fn set_resource_tag(&mut self, resource_name: &str, key: &str, value: &str) {
        if let Some(resource) = self
            .resources
            .iter_mut()
            .find(|r| r.name == resource_name)
        {
            resource.tags.insert(key.to_string(), value.to_string());
        }
    }

    /// Add a new schema version to an existing resource.
    ///
    /// Fails when the resource is unknown or the version label already
    /// exists. A version carrying the default flag moves the resource's
    /// default-version pointer.
    pub fn add_resource_version(
        &mut self,
        resource_name: &str,
        version: SchemaVersion,
    ) -> Result<(), RegistryError> {
        let Some(resource) = self
            .resources
            .iter_mut()
            .find(|r| r.name == resource_name)
        else {
            return Err(RegistryError::ResourceNotFound(resource_name.to_string()));
        };

        if resource.versions.iter().any(|v| v.version == version.version) {
            return Err(RegistryError::VersionConflict {
                resource: resource_name.to_string(),
                version: version.version,
            });
        }

        if version.is_default {
            // At most one version carries the default flag.
            for existing in &mut resource.versions {
                existing.is_default = false;
            }
            resource.default_version = version.version.clone();
        }
        resource.versions.push(version);
        Ok(())
    }

    /// Set the API group version uniformly on every registered resource.
    pub fn set_api_group_version(&mut self, version: &str) {
        for resource in &mut self.resources {
            resource.api_group_version = version.to_string();
        }
    }

    /// Look up the metadata for a registered resource.
    pub fn resource(&self, name: &str) -> Option<&ResourceMetadata> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Load and parse the template catalog; idempotent.
    pub fn load_templates(&mut self) -> anyhow::Result<()> {
        if self.templates.is_none() {
            self.templates = Some(TemplateStore::load()?);
        }
        Ok(())
    }

    pub(crate) fn store(&self) -> anyhow::Result<&TemplateStore> {
        self.templates
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("templates not loaded"))
    }
}

/// Last segment of a module path (`::` or `/` separated), or `resources`
/// when the path is empty.
pub(crate) fn package_alias(path: &str) -> String {
    let last = path.rsplit("::").next().unwrap_or("");
    let last = last.rsplit('/').next().unwrap_or("");
    if last.is_empty() {
        "resources".to_string()
    } else {
        last.to_string()
    }
}
