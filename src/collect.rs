//! Entity accessors for RO-Crate graphs
//!
//! Entities stay plain `serde_json::Value`s; these helpers read ids,
//! types and references without assuming the graph is well formed.

use serde_json::Value;
use std::collections::HashSet;

use crate::alias::AliasResolver;
use crate::vocab::FILE_TYPES;

/// Extract @id from an entity
pub fn extract_id(entity: &Value) -> Option<&str> {
    entity.get("@id").and_then(|v| v.as_str())
}

/// Extract @type as a list of type names
pub fn extract_types(entity: &Value) -> Vec<String> {
    match entity.get("@type") {
        Some(Value::String(t)) => vec![t.clone()],
        Some(Value::Array(arr)) => arr
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        _ => vec![],
    }
}

/// Check if an entity has a specific @type
///
/// A declared type matches when it equals `type_name` or has it as an
/// alias, so `ldac:RepositoryObject` counts as `RepositoryObject`.
pub fn has_type(entity: &Value, type_name: &str, resolver: &AliasResolver) -> bool {
    extract_types(entity)
        .iter()
        .any(|t| t == type_name || resolver.type_aliases(t).iter().any(|a| a == type_name))
}

/// Check if an entity has any of the given types
pub fn has_any_type(entity: &Value, type_names: &[&str], resolver: &AliasResolver) -> bool {
    type_names.iter().any(|t| has_type(entity, t, resolver))
}

/// Check if an entity is a file (`File` or one of its media aliases)
pub fn is_file_entity(entity: &Value, resolver: &AliasResolver) -> bool {
    has_any_type(entity, FILE_TYPES, resolver)
}

/// Every alias present on an entity, in alias order, with its value
pub fn property_values<'a>(entity: &'a Value, aliases: &[String]) -> Vec<(&'a str, &'a Value)> {
    let Some(obj) = entity.as_object() else {
        return Vec::new();
    };
    aliases
        .iter()
        .filter_map(|alias| {
            obj.iter()
                .find(|(key, _)| key.as_str() == alias.as_str())
                .map(|(key, value)| (key.as_str(), value))
        })
        .collect()
}

/// Find a property under any of its aliases, returning key and value
///
/// Follows alias order, but skips a spelling whose value is empty when
/// another spelling carries a value.
pub fn find_property<'a>(
    entity: &'a Value,
    aliases: &[String],
) -> Option<(&'a str, &'a Value)> {
    let present = property_values(entity, aliases);
    present
        .iter()
        .copied()
        .find(|(_, value)| !is_empty_value(Some(*value)))
        .or_else(|| present.first().copied())
}

/// Collect the ids a property value points at
///
/// Accepts bare strings, `{"@id": ...}` objects, and lists of either.
pub fn reference_ids(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) => vec![s.as_str()],
        Value::Object(obj) => obj
            .get("@id")
            .and_then(|v| v.as_str())
            .into_iter()
            .collect(),
        Value::Array(arr) => arr.iter().flat_map(reference_ids).collect(),
        _ => vec![],
    }
}

/// Ids referenced under any alias of a property, first occurrence first
pub fn property_reference_ids<'a>(entity: &'a Value, aliases: &[String]) -> Vec<&'a str> {
    let mut ids: Vec<&str> = Vec::new();
    for (_, value) in property_values(entity, aliases) {
        for id in reference_ids(value) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

/// Emptiness rule shared by the validators
///
/// Null and absent values are empty, lists when zero-length, strings when
/// blank after trimming, objects when they have no keys. Numbers and
/// booleans are never empty.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Array(arr)) => arr.is_empty(),
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Object(obj)) => obj.is_empty(),
        Some(_) => false,
    }
}

/// Get all @id values referenced within an entity's properties
///
/// Any nested object carrying an `@id` counts, whatever else it holds.
/// The entity's own `@id` is not included.
pub fn get_referenced_ids(entity: &Value) -> HashSet<String> {
    let mut ids = HashSet::new();
    if let Some(obj) = entity.as_object() {
        for (key, value) in obj {
            if key != "@id" && key != "@type" {
                collect_referenced_ids(value, &mut ids);
            }
        }
    }
    ids
}

fn collect_referenced_ids(value: &Value, ids: &mut HashSet<String>) {
    match value {
        Value::Object(obj) => {
            if let Some(Value::String(id)) = obj.get("@id") {
                ids.insert(id.clone());
            }
            for (key, v) in obj {
                if key != "@id" && key != "@type" {
                    collect_referenced_ids(v, ids);
                }
            }
        }
        Value::Array(arr) => {
            for item in arr {
                collect_referenced_ids(item, ids);
            }
        }
        _ => {}
    }
}
