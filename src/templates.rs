//! Template store: a fixed catalog of named templates loaded from sources
//! embedded in the binary, parsed with a shared helper function set.

use anyhow::Context as _;
use minijinja::{Environment, Value};
use serde::Serialize;

/// Logical template name → embedded asset path. The catalog is fixed;
/// every entry must resolve and parse for [`TemplateStore::load`] to succeed.
pub const TEMPLATE_CATALOG: &[(&str, &str)] = &[
    // Server templates
    ("handlers", "server/handlers.rs.j2"),
    ("routes", "server/routes.rs.j2"),
    ("models", "server/models.rs.j2"),
    ("openapi", "server/openapi.rs.j2"),
    ("flatModels", "server/flat_models.rs.j2"),
    ("flatHandlers", "server/flat_handlers.rs.j2"),
    // Client templates
    ("client", "client/client.rs.j2"),
    ("clientModels", "client/models.rs.j2"),
    ("clientCmd", "client/cmd.rs.j2"),
    // Storage templates
    ("storage", "storage/file.rs.j2"),
    ("storageEnt", "storage/ent.rs.j2"),
    ("entAdapter", "storage/adapter.rs.j2"),
    ("generate", "storage/generate.rs.j2"),
    // Ent schema templates
    ("entSchemaResource", "ent/schema/resource.rs.j2"),
    ("entSchemaLabel", "ent/schema/label.rs.j2"),
    ("entSchemaAnnotation", "ent/schema/annotation.rs.j2"),
    // Middleware templates
    ("middlewareValidation", "middleware/validation.rs.j2"),
    ("middlewareConditional", "middleware/conditional.rs.j2"),
    ("middlewareVersioning", "middleware/versioning.rs.j2"),
    ("eventBus", "middleware/event-bus.rs.j2"),
    // Reconciliation templates
    ("reconciler", "reconciliation/reconciler.rs.j2"),
    ("reconcilerStub", "reconciliation/stub.rs.j2"),
    ("reconcilerRegistration", "reconciliation/registration.rs.j2"),
    ("eventHandlers", "reconciliation/event-handlers.rs.j2"),
];

const TEMPLATE_SOURCES: &[(&str, &str)] = &[
    (
        "server/handlers.rs.j2",
        include_str!("../templates/server/handlers.rs.j2"),
    ),
    (
        "server/routes.rs.j2",
        include_str!("../templates/server/routes.rs.j2"),
    ),
    (
        "server/models.rs.j2",
        include_str!("../templates/server/models.rs.j2"),
    ),
    (
        "server/openapi.rs.j2",
        include_str!("../templates/server/openapi.rs.j2"),
    ),
    (
        "server/flat_models.rs.j2",
        include_str!("../templates/server/flat_models.rs.j2"),
    ),
    (
        "server/flat_handlers.rs.j2",
        include_str!("../templates/server/flat_handlers.rs.j2"),
    ),
    (
        "client/client.rs.j2",
        include_str!("../templates/client/client.rs.j2"),
    ),
    (
        "client/models.rs.j2",
        include_str!("../templates/client/models.rs.j2"),
    ),
    (
        "client/cmd.rs.j2",
        include_str!("../templates/client/cmd.rs.j2"),
    ),
    (
        "storage/file.rs.j2",
        include_str!("../templates/storage/file.rs.j2"),
    ),
    (
        "storage/ent.rs.j2",
        include_str!("../templates/storage/ent.rs.j2"),
    ),
    (
        "storage/adapter.rs.j2",
        include_str!("../templates/storage/adapter.rs.j2"),
    ),
    (
        "storage/generate.rs.j2",
        include_str!("../templates/storage/generate.rs.j2"),
    ),
    (
        "ent/schema/resource.rs.j2",
        include_str!("../templates/ent/schema/resource.rs.j2"),
    ),
    (
        "ent/schema/label.rs.j2",
        include_str!("../templates/ent/schema/label.rs.j2"),
    ),
    (
        "ent/schema/annotation.rs.j2",
        include_str!("../templates/ent/schema/annotation.rs.j2"),
    ),
    (
        "middleware/validation.rs.j2",
        include_str!("../templates/middleware/validation.rs.j2"),
    ),
    (
        "middleware/conditional.rs.j2",
        include_str!("../templates/middleware/conditional.rs.j2"),
    ),
    (
        "middleware/versioning.rs.j2",
        include_str!("../templates/middleware/versioning.rs.j2"),
    ),
    (
        "middleware/event-bus.rs.j2",
        include_str!("../templates/middleware/event-bus.rs.j2"),
    ),
    (
        "reconciliation/reconciler.rs.j2",
        include_str!("../templates/reconciliation/reconciler.rs.j2"),
    ),
    (
        "reconciliation/stub.rs.j2",
        include_str!("../templates/reconciliation/stub.rs.j2"),
    ),
    (
        "reconciliation/registration.rs.j2",
        include_str!("../templates/reconciliation/registration.rs.j2"),
    ),
    (
        "reconciliation/event-handlers.rs.j2",
        include_str!("../templates/reconciliation/event-handlers.rs.j2"),
    ),
];

/// The fixed template catalog; exposed so outer tooling (project init,
/// doc generation) can enumerate the shipped templates.
pub fn template_catalog() -> &'static [(&'static str, &'static str)] {
    TEMPLATE_CATALOG
}

/// Read an embedded template source by asset path.
pub fn template_source(path: &str) -> Option<&'static str> {
    TEMPLATE_SOURCES
        .iter()
        .find(|(p, _)| *p == path)
        .map(|(_, source)| *source)
}

/// Name-indexed store of parsed templates sharing one helper set.
pub struct TemplateStore {
    env: Environment<'static>,
}

impl TemplateStore {
    /// Load and parse every catalog entry. Any missing asset or parse
    /// error fails the load.
    pub fn load() -> anyhow::Result<Self> {
        let mut env = Environment::new();
        register_helpers(&mut env);
        for (name, path) in TEMPLATE_CATALOG {
            let source = template_source(path)
                .with_context(|| format!("failed to read embedded template {path}"))?;
            env.add_template(name, source)
                .with_context(|| format!("failed to parse template {path}"))?;
        }
        tracing::debug!(templates = TEMPLATE_CATALOG.len(), "template store loaded");
        Ok(Self { env })
    }

    /// Execute the named template against a serializable context.
    pub fn render<C: Serialize>(&self, name: &str, context: &C) -> anyhow::Result<String> {
        let template = self
            .env
            .get_template(name)
            .with_context(|| format!("template {name} not found"))?;
        template
            .render(context)
            .with_context(|| format!("failed to execute template {name}"))
    }
}

fn register_helpers(env: &mut Environment<'static>) {
    env.add_function("toLower", |s: String| s.to_lowercase());
    env.add_function("toUpper", |s: String| s.to_uppercase());
    env.add_function("title", title_case);
    env.add_function("trimPrefix", |prefix: String, s: String| {
        s.strip_prefix(prefix.as_str()).unwrap_or(s.as_str()).to_string()
    });
    env.add_function("replace", |old: String, new: String, s: String| {
        s.replace(old.as_str(), new.as_str())
    });
    env.add_function("split", |sep: String, s: String| {
        s.split(sep.as_str()).map(String::from).collect::<Vec<_>>()
    });
    env.add_function("last", |seq: Vec<String>| {
        seq.last().cloned().unwrap_or_default()
    });
    env.add_function("camelCase", camel_case);
    env.add_function("specToJSON", spec_to_json);
    env.add_function("specToJSONPretty", spec_to_json_pretty);
}

/// English title case: the first letter of each word uppercased, the rest
/// lowercased; whitespace preserved.
pub fn title_case(s: String) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Lowercase the first letter, leave the rest unchanged.
pub fn camel_case(s: String) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => s,
    }
}

/// Render a field list as a single-line JSON object literal using the
/// example values; `{"name": "example"}` when the list is empty.
pub fn spec_to_json(fields: Value) -> Result<String, minijinja::Error> {
    let parts = json_parts(&fields, "")?;
    if parts.is_empty() {
        return Ok(r#"{"name": "example"}"#.to_string());
    }
    Ok(format!("{{{}}}", parts.join(", ")))
}

/// Indented multi-line form of [`spec_to_json`].
pub fn spec_to_json_pretty(fields: Value) -> Result<String, minijinja::Error> {
    let parts = json_parts(&fields, "    ")?;
    if parts.is_empty() {
        return Ok("{\n    \"name\": \"example\"\n  }".to_string());
    }
    Ok(format!("{{\n{}\n  }}", parts.join(",\n")))
}

fn json_parts(fields: &Value, indent: &str) -> Result<Vec<String>, minijinja::Error> {
    let mut parts = Vec::new();
    for field in fields.try_iter()? {
        let json_name = attr_string(&field, "JSONName")?;
        let ty = attr_string(&field, "Type")?;
        let example = attr_string(&field, "ExampleValue")?;
        parts.push(format!(
            "{indent}\"{json_name}\": {}",
            format_json_value(&ty, &example)
        ));
    }
    Ok(parts)
}

fn attr_string(value: &Value, key: &str) -> Result<String, minijinja::Error> {
    Ok(value
        .get_attr(key)?
        .as_str()
        .unwrap_or_default()
        .to_string())
}

/// Format an example value for JSON output keyed by the declared type
/// spelling: scalar types stay unquoted, sequences wrap, mappings expand,
/// everything else is quoted.
pub fn format_json_value(ty: &str, value: &str) -> String {
    const SCALARS: &[&str] = &[
        "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
        "f32", "f64", "bool",
    ];
    if SCALARS.iter().any(|scalar| ty.contains(scalar)) {
        return value.to_string();
    }
    if ty.contains("Vec<") {
        return format!("[\"{value}\"]");
    }
    if ty.contains("Map<") {
        return format!("{{\"{value}\": \"value\"}}");
    }
    format!("\"{value}\"")
}
