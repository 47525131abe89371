//! Code generation for REST API resources.
//!
//! This crate generates consistent CRUD handlers, storage, client code and
//! reconcilers for user-defined resource types. The goal is to eliminate
//! boilerplate while keeping type safety and consistency across the API.
//!
//! Architecture:
//!   - Templates define the code patterns
//!   - [`ResourceMetadata`] describes each resource type
//!   - [`Generator`] applies templates to metadata
//!   - Output is rustfmt-formatted Rust code
//!
//! Usage:
//!
//! ```no_run
//! use std::path::Path;
//!
//! use resforge::{Generator, TypeDescriptor};
//!
//! let mut generator = Generator::new("out", "main", "github.com/example/app");
//! let descriptor = TypeDescriptor::from_file(Path::new("device.yaml")).unwrap();
//! generator.register_resource(&descriptor);
//! generator.generate_all().unwrap();
//! ```

pub mod config;
pub mod context;
pub mod descriptor;
pub mod generator;
pub mod introspect;
pub mod metadata;
pub mod prefix;
pub mod templates;

pub use config::{
    DbDriver, EtagAlgorithm, EventBusKind, GeneratorConfig, StorageKind, ValidationMode,
    VersionStrategy,
};
pub use descriptor::{FieldDescriptor, SectionDescriptor, TypeDescriptor};
pub use generator::{Generator, RegistryError};
pub use introspect::{example_value, extract_fields, SpecField};
pub use metadata::{ResourceMetadata, SchemaVersion};
pub use prefix::{default_id_prefix, id_prefix, register_id_prefix};
pub use templates::{template_catalog, template_source, TemplateStore};
