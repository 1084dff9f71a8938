use std::collections::HashSet;

use serde_json::{Map, Value};

use super::name_mapping::NameMapping;
use super::name_normalizer::{decode_pointer_segment, normalize_schema_name};
use crate::config::CollisionPolicy;
use crate::error::NormalizeError;

pub const REF_KEY: &str = "$ref";
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Rewrite a single reference string against the mapping.
///
/// Only local schema references whose target is a registry name change;
/// anything else is returned as-is.
pub fn rewrite_ref(ref_path: &str, mapping: &NameMapping) -> String {
    let Some(name) = ref_path.strip_prefix(SCHEMA_REF_PREFIX) else {
        return ref_path.to_string();
    };
    let decoded = decode_pointer_segment(name);
    match mapping.get(&decoded).or_else(|| mapping.get(name)) {
        Some(normalized) => format!("{SCHEMA_REF_PREFIX}{normalized}"),
        None => ref_path.to_string(),
    }
}

/// Deep copy of `node` with every schema `$ref` rewritten through `mapping`.
///
/// The output has the same keys, in the same order, and arrays of the same
/// length; only `$ref` string values may differ.
pub fn rewrite_refs(node: &Value, mapping: &NameMapping) -> Value {
    match node {
        Value::Object(map) => {
            let rewritten: Map<String, Value> = map
                .iter()
                .map(|(key, value)| {
                    let value = match value {
                        Value::String(s) if key == REF_KEY => {
                            Value::String(rewrite_ref(s, mapping))
                        }
                        other => rewrite_refs(other, mapping),
                    };
                    (key.clone(), value)
                })
                .collect();
            Value::Object(rewritten)
        }
        Value::Array(items) => {
            Value::Array(items.iter().map(|item| rewrite_refs(item, mapping)).collect())
        }
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => node.clone(),
    }
}

/// Every `$ref` string value in `node`, in document order.
pub fn collect_refs(node: &Value) -> Vec<String> {
    fn walk(node: &Value, out: &mut Vec<String>) {
        match node {
            Value::Object(map) => {
                for (key, value) in map {
                    match value {
                        Value::String(s) if key == REF_KEY => out.push(s.clone()),
                        other => walk(other, out),
                    }
                }
            }
            Value::Array(items) => items.iter().for_each(|item| walk(item, out)),
            Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {}
        }
    }

    let mut out = Vec::new();
    walk(node, &mut out);
    out
}

/// References that point outside the registry but normalize to the name of
/// a definition that will be injected later, as `(reference name, symbol)`.
pub fn synthetic_aliases(doc: &Value, synthetic: &[&str]) -> Vec<(String, String)> {
    let registry: HashSet<&str> = doc
        .pointer("/components/schemas")
        .and_then(Value::as_object)
        .map(|schemas| schemas.keys().map(String::as_str).collect())
        .unwrap_or_default();

    let mut seen = HashSet::new();
    let mut aliases = Vec::new();
    for reference in collect_refs(doc) {
        let Some(name) = reference.strip_prefix(SCHEMA_REF_PREFIX) else {
            continue;
        };
        let decoded = decode_pointer_segment(name);
        if registry.contains(name) || registry.contains(decoded.as_str()) {
            continue;
        }
        let normalized = normalize_schema_name(&decoded);
        if !synthetic.contains(&normalized.as_str()) {
            log::debug!("reference {reference} points outside the schema registry");
            continue;
        }
        if seen.insert(name.to_string()) {
            log::debug!("reference {reference} bound to synthetic schema {normalized}");
            aliases.push((name.to_string(), normalized));
        }
    }
    aliases
}

/// Build the name mapping from `components.schemas` and rename its keys in place,
/// keeping registry order. Schema bodies are not touched here.
///
/// `synthetic` names definitions the completer adds afterwards; dangling
/// references that normalize to one of them are bound to it.
pub fn normalize_schema_registry(
    doc: &mut Value,
    policy: CollisionPolicy,
    synthetic: &[&str],
) -> Result<NameMapping, NormalizeError> {
    let aliases = synthetic_aliases(doc, synthetic);

    let Some(schemas) = doc
        .get_mut("components")
        .and_then(|c| c.get_mut("schemas"))
        .and_then(Value::as_object_mut)
    else {
        return NameMapping::build_with_aliases(std::iter::empty(), aliases, policy);
    };

    let mapping =
        NameMapping::build_with_aliases(schemas.keys().map(String::as_str), aliases, policy)?;

    let renamed: Map<String, Value> = std::mem::take(schemas)
        .into_iter()
        .map(|(name, schema)| (mapping.resolve(&name).to_string(), schema))
        .collect();
    *schemas = renamed;

    log::debug!("normalized {} schema names", mapping.len());
    Ok(mapping)
}

/// Run both phases over a raw document: rename the schema registry, then
/// rewrite every reference in the whole tree against the resulting mapping.
pub fn normalize_document(
    mut doc: Value,
    policy: CollisionPolicy,
    synthetic: &[&str],
) -> Result<(Value, NameMapping), NormalizeError> {
    let mapping = normalize_schema_registry(&mut doc, policy, synthetic)?;
    let rewritten = rewrite_refs(&doc, &mapping);
    Ok((rewritten, mapping))
}
