use std::collections::BTreeMap;

use serde::Serialize;

use crate::introspect::SpecField;

/// A specific version of a resource schema.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SchemaVersion {
    /// e.g. `v1`, `v2beta1`
    pub version: String,
    /// Whether this is the default/storage version
    pub is_default: bool,
    /// `stable`, `beta` or `alpha`
    pub stability: String,
    /// Whether this version is deprecated
    pub deprecated: bool,
    /// Qualified spec type (e.g. `device::DeviceSpec`)
    pub spec_type: String,
    /// Qualified status type (e.g. `device::DeviceStatus`)
    pub status_type: String,
    /// Qualified resource type (e.g. `device::Device`)
    pub type_name: String,
    /// Module path for this version
    pub package: String,
    /// Transformations applied to reach this version
    pub transforms: Vec<String>,
}

/// Metadata about a registered resource type, the unit the generation
/// pipeline iterates over.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceMetadata {
    /// e.g. `Device`
    pub name: String,
    /// e.g. `devices`
    pub plural_name: String,
    /// e.g. `crate::resources::device`
    pub package: String,
    /// e.g. `device`
    pub package_alias: String,
    /// e.g. `device::Device`
    pub type_name: String,
    /// e.g. `device::DeviceSpec`
    pub spec_type: String,
    /// e.g. `device::DeviceStatus`
    pub status_type: String,
    /// e.g. `/devices`
    #[serde(rename = "URLPath")]
    pub url_path: String,
    /// Stem for storage function names; same as the logical name
    pub storage_name: String,
    /// Per-resource opt-ins (e.g. `versioning` → `enabled`)
    pub tags: BTreeMap<String, String>,
    /// Fields of the `Spec` section, in declared order
    pub spec_fields: Vec<SpecField>,
    /// Fields of the `Status` section, in declared order
    pub status_fields: Vec<SpecField>,
    /// Registered schema versions
    pub versions: Vec<SchemaVersion>,
    /// Label of the default schema version
    pub default_version: String,
    /// API group version (e.g. `v2`)
    #[serde(rename = "APIGroupVersion")]
    pub api_group_version: String,
}

impl ResourceMetadata {
    /// Whether this resource opted into per-resource versioning via its tags.
    pub fn per_resource_versioning(&self) -> bool {
        matches!(
            self.tags.get("versioning").map(String::as_str),
            Some("enabled") | Some("true") | Some("1")
        )
    }
}
