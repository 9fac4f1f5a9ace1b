//! Entity-level validation
//!
//! Checks a single graph entity against the profile's required inputs for
//! each of its declared types, plus the LDAC language and file-license
//! rules. Every finding is pushed as a message; nothing here fails.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::alias::AliasResolver;
use crate::collect::{extract_id, extract_types, find_property, is_empty_value};
use crate::profile::{ProfileIndex, RequiredInput};
use crate::vocab::{LANGUAGE_ID_PREFIX, LDAC_SUBJECT_LANGUAGE, SCHEMA_LICENSE};

/// Profile-driven required-property check
#[derive(Debug, Clone, Copy)]
pub struct ProfileCheck<'a> {
    pub profile: &'a ProfileIndex,
    pub resolver: &'a AliasResolver,
    /// Classes whose required inputs produce errors
    pub enforced: &'a BTreeSet<String>,
}

impl<'a> ProfileCheck<'a> {
    fn is_enforced(&self, class_name: &str) -> bool {
        self.enforced.contains(class_name)
            || self
                .resolver
                .type_aliases(class_name)
                .iter()
                .any(|alias| self.enforced.contains(alias))
    }

    /// Validate one entity against the rules of every declared type
    pub fn validate_entity(&self, entity: &Value, entity_name: &str, errors: &mut Vec<String>) {
        let Some(obj) = entity.as_object() else {
            return;
        };
        let mut evaluated: HashSet<&str> = HashSet::new();

        for type_name in extract_types(entity) {
            let Some(rule) = self.profile.lookup(&type_name, self.resolver) else {
                continue;
            };
            if !self.is_enforced(&rule.name) {
                continue;
            }

            // First non-empty spelling wins when an entity uses two aliases
            // of one property
            let mut matched: BTreeMap<String, &Value> = BTreeMap::new();
            for (key, value) in obj {
                if let Some(input) = rule.input_for_key(key) {
                    let slot = matched
                        .entry(format!("{}:{}", rule.name, input.primary_alias))
                        .or_insert(value);
                    if is_empty_value(Some(*slot)) {
                        *slot = value;
                    }
                }
            }

            for input in &rule.inputs {
                if !evaluated.insert(input.id.as_str()) {
                    continue;
                }
                let value = matched
                    .get(&format!("{}:{}", rule.name, input.primary_alias))
                    .copied();
                if let Some(message) = check_input(input, value) {
                    errors.push(format!("{} ({}) {}", entity_name, rule.name, message));
                }
            }
        }
    }
}

fn check_input(input: &RequiredInput, value: Option<&Value>) -> Option<String> {
    let alias = &input.primary_alias;
    match value {
        Some(Value::Array(items)) if items.is_empty() => {
            Some(format!("has an empty {} array", alias))
        }
        v if is_empty_value(v) => Some(format!("is missing required {} property", alias)),
        Some(Value::Array(_)) if input.multiple == Some(false) => {
            Some(format!("expects {} to be a single value", alias))
        }
        _ => None,
    }
}

/// Validate the `ldac:subjectLanguage` property of an entity
///
/// Must be a non-empty list of `{"@id": ...}` references. References that
/// are neither `#language_<code>` fragments nor URIs only warn.
pub fn validate_entity_languages(
    entity: &Value,
    entity_name: &str,
    resolver: &AliasResolver,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let aliases = resolver.property_aliases(LDAC_SUBJECT_LANGUAGE);
    let Some((_, value)) = find_property(entity, &aliases) else {
        errors.push(format!(
            "{} is missing required ldac:subjectLanguage property",
            entity_name
        ));
        return;
    };

    let Some(items) = value.as_array() else {
        errors.push(format!("{} ldac:subjectLanguage must be an array", entity_name));
        return;
    };
    if items.is_empty() {
        errors.push(format!("{} ldac:subjectLanguage array is empty", entity_name));
        return;
    }

    for (i, item) in items.iter().enumerate() {
        match extract_id(item).filter(|_| item.is_object()) {
            None => errors.push(format!(
                "{} ldac:subjectLanguage[{}] must be an object with an @id",
                entity_name, i
            )),
            Some(id) if !id.starts_with(LANGUAGE_ID_PREFIX) && !id.starts_with("http") => {
                warnings.push(format!(
                    "{} ldac:subjectLanguage[{}] references \"{}\", expected a {}<code> id or a URI",
                    entity_name, i, id, LANGUAGE_ID_PREFIX
                ))
            }
            Some(_) => {}
        }
    }
}

/// Validate the license of a file entity
///
/// A missing license is only a warning; a present one must be a reference.
pub fn validate_file_license(
    file: &Value,
    resolver: &AliasResolver,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let id = extract_id(file).unwrap_or("<no @id>");
    let aliases = resolver.property_aliases(SCHEMA_LICENSE);
    match find_property(file, &aliases) {
        None => warnings.push(format!(
            "File \"{}\" has no license; consider adding a license reference",
            id
        )),
        Some((_, license)) => {
            let is_reference = license.is_object() && extract_id(license).is_some();
            if !is_reference {
                errors.push(format!(
                    "File \"{}\" license must be an object with an @id",
                    id
                ));
            }
        }
    }
}
