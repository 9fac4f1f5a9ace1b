//! Base RO-Crate structural checks
//!
//! Profile-independent RO-Crate 1.2 rules: document shape, `@id`
//! uniqueness and syntax, the metadata descriptor, and the directory-id
//! convention for `Dataset` entities.

use serde_json::Value;
use std::collections::HashSet;

use crate::alias::AliasResolver;
use crate::collect::{extract_id, has_type, is_file_entity};
use crate::id::{check_id_syntax, is_unparseable_web_id, lacks_directory_slash};
use crate::vocab::{
    is_descriptor_id, METADATA_DESCRIPTOR_ID, ROCRATE_PROFILE_PREFIX, TYPE_CREATIVE_WORK,
    TYPE_DATASET,
};

/// Get the `@graph` array, or the fatal error that stops validation
pub fn graph_of(document: &Value) -> Result<&[Value], String> {
    match document.get("@graph") {
        Some(Value::Array(graph)) => Ok(graph),
        Some(_) => Err("@graph must be an array".to_string()),
        None => Err("Missing @graph: document has no entities".to_string()),
    }
}

/// Run every structural check after the `@graph` shape check
pub fn validate_structure(
    document: &Value,
    graph: &[Value],
    resolver: &AliasResolver,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    check_context(document, errors, warnings);
    check_unique_ids(graph, errors);
    check_descriptor(graph, resolver, errors, warnings);
    for (position, entity) in graph.iter().enumerate() {
        check_entity(position, entity, resolver, errors, warnings);
    }
}

fn check_context(document: &Value, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    let Some(context) = document.get("@context") else {
        errors.push("Missing @context".to_string());
        return;
    };

    let mentions_rocrate = |v: &Value| {
        v.as_str()
            .map(|s| s.starts_with(ROCRATE_PROFILE_PREFIX))
            .unwrap_or(false)
    };
    let found = match context {
        Value::Array(entries) => entries.iter().any(mentions_rocrate),
        other => mentions_rocrate(other),
    };
    if !found {
        warnings.push(format!(
            "@context does not reference an RO-Crate context ({}...)",
            ROCRATE_PROFILE_PREFIX
        ));
    }
}

fn check_unique_ids(graph: &[Value], errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for id in graph.iter().filter_map(extract_id) {
        if !seen.insert(id) {
            errors.push(format!("Duplicate @id \"{}\" in @graph", id));
        }
    }
}

fn check_descriptor(
    graph: &[Value],
    resolver: &AliasResolver,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let descriptors: Vec<&Value> = graph
        .iter()
        .filter(|e| extract_id(e).map(is_descriptor_id).unwrap_or(false))
        .collect();

    let Some(descriptor) = descriptors.first() else {
        errors.push(format!(
            "Missing metadata descriptor entity \"{}\"",
            METADATA_DESCRIPTOR_ID
        ));
        return;
    };
    let distinct: HashSet<&str> = descriptors.iter().filter_map(|e| extract_id(e)).collect();
    if distinct.len() > 1 {
        errors.push(
            "Found both ro-crate-metadata.json and ro-crate-metadata.jsonld descriptors; expected exactly one"
                .to_string(),
        );
    }

    let id = extract_id(descriptor).unwrap_or(METADATA_DESCRIPTOR_ID);
    if !has_type(descriptor, TYPE_CREATIVE_WORK, resolver) {
        errors.push(format!(
            "Metadata descriptor \"{}\" must have @type CreativeWork",
            id
        ));
    }
    if descriptor.get("about").is_none() {
        errors.push(format!(
            "Metadata descriptor \"{}\" is missing the about property",
            id
        ));
    }
    if descriptor.get("conformsTo").is_none() {
        warnings.push(format!(
            "Metadata descriptor \"{}\" has no conformsTo; it should declare the RO-Crate version",
            id
        ));
    }
}

fn check_entity(
    position: usize,
    entity: &Value,
    resolver: &AliasResolver,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    if !entity.is_object() {
        errors.push(format!("Entity at index {} is not an object", position));
        return;
    }

    let id = extract_id(entity);
    let has_type_key = entity.get("@type").is_some();
    let label = match id {
        Some(id) => format!("Entity \"{}\"", id),
        None => format!("Entity at index {}", position),
    };

    if id.is_none() {
        errors.push(format!("{} is missing @id", label));
    }
    if !has_type_key {
        errors.push(format!("{} is missing @type", label));
    }
    if id.is_none() && !has_type_key && entity.get("name").is_none() {
        warnings.push(format!(
            "{} has no @id, @type or name and carries no identifiable content",
            label
        ));
    }

    let Some(id) = id else {
        return;
    };
    if let Err(reason) = check_id_syntax(id) {
        errors.push(format!("Invalid @id \"{}\": {}", id, reason));
        return;
    }
    if is_unparseable_web_id(id) {
        warnings.push(format!("@id \"{}\" looks like a URL but does not parse", id));
    }
    // Files accept any syntactically valid id
    if has_type(entity, TYPE_DATASET, resolver)
        && !is_file_entity(entity, resolver)
        && lacks_directory_slash(id)
    {
        warnings.push(format!(
            "Dataset \"{}\" @id should end with '/' to denote a directory",
            id
        ));
    }
}
