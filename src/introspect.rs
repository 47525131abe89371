use serde::Serialize;

use crate::descriptor::TypeDescriptor;

/// A field extracted from a resource spec or status section.
///
/// This record is the data contract between introspection and the templates;
/// the serialized attribute names are referenced by template sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpecField {
    /// Source field name (e.g. `Description`)
    pub name: String,
    /// Serialization name (e.g. `description`)
    #[serde(rename = "JSONName")]
    pub json_name: String,
    /// Declared Rust type (e.g. `String`, `i32`)
    #[serde(rename = "Type")]
    pub ty: String,
    /// Whether the field is required
    pub required: bool,
    /// Example value for documentation
    pub example_value: String,
}

/// Declared-kind classification over Rust type spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    Int,
    Uint,
    Float,
    Bool,
    List,
    Map,
    Other,
}

pub(crate) fn field_kind(ty: &str) -> FieldKind {
    match ty.trim() {
        "String" | "&str" | "str" => FieldKind::Text,
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" => FieldKind::Int,
        "u8" | "u16" | "u32" | "u64" | "u128" | "usize" => FieldKind::Uint,
        "f32" | "f64" => FieldKind::Float,
        "bool" => FieldKind::Bool,
        t if t.starts_with("Vec<") => FieldKind::List,
        t if t.contains("Map<") => FieldKind::Map,
        _ => FieldKind::Other,
    }
}

fn list_element(ty: &str) -> Option<&str> {
    ty.trim()
        .strip_prefix("Vec<")
        .and_then(|s| s.strip_suffix('>'))
        .map(str::trim)
}

/// Extract field records from the named section of a resource descriptor.
///
/// A missing section yields an empty list. Non-public fields and fields whose
/// serialization tag starts with `-` are skipped silently. An empty tag falls
/// back to the source field name.
pub fn extract_fields(descriptor: &TypeDescriptor, target: &str) -> Vec<SpecField> {
    let Some(section) = descriptor.sections.iter().find(|s| s.name == target) else {
        return Vec::new();
    };

    let mut fields = Vec::new();
    for field in &section.fields {
        if !field.public {
            continue;
        }

        let mut json_name = field.name.clone();
        if !field.json.is_empty() {
            let first = field.json.split(',').next().unwrap_or("");
            if first == "-" {
                continue;
            }
            if !first.is_empty() {
                json_name = first.to_string();
            }
        }

        let required = field.validate.contains("required");

        fields.push(SpecField {
            name: field.name.clone(),
            json_name,
            ty: field.ty.clone(),
            required,
            example_value: example_value(&field.ty, &field.name),
        });
    }
    fields
}

/// Synthesize an example value for a field based on its type and name.
///
/// Examples populate OpenAPI specs and usage snippets in generated docs;
/// deterministic substring rules keep them stable and human-recognizable.
pub fn example_value(ty: &str, field_name: &str) -> String {
    match field_kind(ty) {
        FieldKind::Text => {
            let lower = field_name.to_lowercase();
            let example = if lower.contains("name") {
                "example-name"
            } else if lower.contains("description") {
                "Example description"
            } else if lower.contains("email") {
                "user@example.com"
            } else if lower.contains("url") || lower.contains("uri") {
                "https://example.com"
            } else if lower.contains("ip") || lower.contains("address") {
                "192.168.1.1"
            } else if lower.contains("location") {
                "DataCenter A"
            } else {
                "example-value"
            };
            example.to_string()
        }
        FieldKind::Int | FieldKind::Uint => "42".to_string(),
        FieldKind::Float => "3.14".to_string(),
        FieldKind::Bool => "true".to_string(),
        FieldKind::List => {
            if list_element(ty) == Some("String") {
                r#"["item1","item2"]"#.to_string()
            } else {
                "[]".to_string()
            }
        }
        FieldKind::Map => r#"{"key":"value"}"#.to_string(),
        FieldKind::Other => "{}".to_string(),
    }
}
