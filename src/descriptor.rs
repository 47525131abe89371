use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Describes a user resource type: a record with named sub-records
/// (conventionally `Spec` and `Status`) from which metadata is extracted.
///
/// Descriptors can be built in code or loaded from a YAML/JSON schema file
/// via [`TypeDescriptor::from_file`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Logical resource name (e.g. `Device`)
    pub name: String,
    /// Module path of the user's type (e.g. `crate::resources::device`)
    #[serde(default)]
    pub package: String,
    /// Named sub-records; the introspector looks up `Spec` and `Status`
    #[serde(default)]
    pub sections: Vec<SectionDescriptor>,
}

/// A named sub-record of a resource type (`Spec`, `Status`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionDescriptor {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

/// A single field of a sub-record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Source field name, original case (e.g. `ComponentType`)
    pub name: String,
    /// Declared Rust type (e.g. `String`, `i32`, `Vec<String>`)
    #[serde(rename = "type")]
    pub ty: String,
    /// Serialization tag, verbatim (e.g. `componentType,omitempty`; `-` hides)
    #[serde(default)]
    pub json: String,
    /// Validation tag; the token `required` marks the field mandatory
    #[serde(default)]
    pub validate: String,
    /// Non-public fields are skipped during extraction
    #[serde(default = "default_public")]
    pub public: bool,
}

fn default_public() -> bool {
    true
}

impl Default for FieldDescriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
            ty: String::new(),
            json: String::new(),
            validate: String::new(),
            public: true,
        }
    }
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            sections: Vec::new(),
        }
    }

    /// Append a named section; chainable for descriptor literals in code.
    pub fn section(mut self, name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        self.sections.push(SectionDescriptor {
            name: name.into(),
            fields,
        });
        self
    }

    /// Load a descriptor from a `.yaml`/`.yml` or `.json` file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read descriptor {}", path.display()))?;
        let descriptor = if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        ) {
            serde_yaml::from_str(&raw)
                .with_context(|| format!("failed to parse descriptor {}", path.display()))?
        } else {
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse descriptor {}", path.display()))?
        };
        Ok(descriptor)
    }
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            ..Self::default()
        }
    }

    pub fn json(mut self, tag: impl Into<String>) -> Self {
        self.json = tag.into();
        self
    }

    pub fn validate(mut self, tag: impl Into<String>) -> Self {
        self.validate = tag.into();
        self
    }

    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }
}
