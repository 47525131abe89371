//! Process-wide registry mapping resource kinds to short identifier
//! prefixes (`Device` → `dev`), used by the generated storage layer when
//! minting instance identifiers.
//!
//! User resource modules register their prefix as they initialize;
//! registration is effectively append-only and reads happen during
//! generation and at the generated server's runtime.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

static ID_PREFIXES: Lazy<RwLock<HashMap<String, String>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Register the identifier prefix for a resource kind, replacing any
/// previously registered value.
pub fn register_id_prefix(kind: &str, prefix: &str) {
    let mut prefixes = ID_PREFIXES.write().expect("prefix registry poisoned");
    prefixes.insert(kind.to_string(), prefix.to_string());
}

/// Seed a prefix only if the kind has none yet; used at resource
/// registration so explicit user registrations always win.
pub(crate) fn seed_id_prefix(kind: &str, prefix: &str) {
    let mut prefixes = ID_PREFIXES.write().expect("prefix registry poisoned");
    prefixes
        .entry(kind.to_string())
        .or_insert_with(|| prefix.to_string());
}

/// Look up the registered prefix for a kind.
pub fn id_prefix(kind: &str) -> Option<String> {
    let prefixes = ID_PREFIXES.read().expect("prefix registry poisoned");
    prefixes.get(kind).cloned()
}

/// Default prefix: the first three characters of the lowercased kind.
pub fn default_id_prefix(kind: &str) -> String {
    kind.to_lowercase().chars().take(3).collect()
}
