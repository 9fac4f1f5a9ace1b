//! Profile rule index
//!
//! Compiles a declarative profile document
//! (`{"classes": {Name: {"inputs": [{id, name?, required?, multiple?}]}}}`)
//! into a lookup from class name, or any alias of it, to the class's
//! required-property rules. Built once; read-only afterwards.

use serde::Deserialize;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::alias::{Aliases, AliasResolver};
use crate::error::ValidateError;

/// The LDAC profile shipped with the crate
pub const LDAC_PROFILE_JSON: &str = include_str!("../profiles/ldac.json");

/// Profile document as authored
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileDocument {
    #[serde(default)]
    pub classes: BTreeMap<String, ProfileClass>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileClass {
    #[serde(default)]
    pub inputs: Vec<ProfileInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInput {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub multiple: Option<bool>,
}

/// A required property of a class
#[derive(Debug, Clone)]
pub struct RequiredInput {
    /// Canonical property id
    pub id: String,
    /// `Some(false)` means the value must not be a list
    pub multiple: Option<bool>,
    pub aliases: Aliases,
    /// Spelling used in messages
    pub primary_alias: String,
}

/// Required-property rules of one profile class
#[derive(Debug, Clone)]
pub struct ClassRule {
    pub name: String,
    pub inputs: Vec<RequiredInput>,
    /// Every alias of every required input, mapped to its index in `inputs`
    pub alias_map: HashMap<String, usize>,
}

impl ClassRule {
    /// The required input an entity key stands for, if any
    pub fn input_for_key(&self, key: &str) -> Option<&RequiredInput> {
        self.alias_map.get(key).map(|&i| &self.inputs[i])
    }
}

/// Class name or alias → class rule
#[derive(Debug, Clone, Default)]
pub struct ProfileIndex {
    rules: HashMap<String, Arc<ClassRule>>,
    class_names: Vec<String>,
}

impl ProfileIndex {
    /// Compile a profile document
    pub fn build(document: &ProfileDocument, resolver: &AliasResolver) -> Self {
        let mut index = ProfileIndex::default();

        for (class_name, class) in &document.classes {
            let mut inputs = Vec::new();
            let mut alias_map = HashMap::new();

            for input in class.inputs.iter().filter(|i| i.required) {
                let aliases = resolver.property_aliases(&input.id);
                let primary_alias = resolver.preferred_alias(&input.id);
                let position = inputs.len();
                for alias in aliases.iter() {
                    match alias_map.entry(alias.clone()) {
                        Entry::Vacant(slot) => {
                            slot.insert(position);
                        }
                        Entry::Occupied(slot) => {
                            let kept: &RequiredInput = &inputs[*slot.get()];
                            tracing::warn!(
                                class = %class_name,
                                %alias,
                                kept = %kept.id,
                                ignored = %input.id,
                                "alias shared by two required inputs, keeping the first"
                            );
                        }
                    }
                }
                inputs.push(RequiredInput {
                    id: input.id.clone(),
                    multiple: input.multiple,
                    aliases,
                    primary_alias,
                });
            }

            let rule = Arc::new(ClassRule {
                name: class_name.clone(),
                inputs,
                alias_map,
            });
            for alias in resolver.type_aliases(class_name).iter() {
                index.rules.insert(alias.clone(), Arc::clone(&rule));
            }
            index.class_names.push(class_name.clone());
        }

        tracing::debug!(
            classes = index.class_names.len(),
            aliases = index.rules.len(),
            "compiled profile rule index"
        );
        index
    }

    /// Parse and compile a profile document from JSON text
    pub fn from_json(content: &str, resolver: &AliasResolver) -> Result<Self, ValidateError> {
        let document: ProfileDocument = serde_json::from_str(content)
            .map_err(|e| ValidateError::InvalidProfile(e.to_string()))?;
        Ok(Self::build(&document, resolver))
    }

    /// The embedded LDAC profile
    pub fn ldac(resolver: &AliasResolver) -> Result<Self, ValidateError> {
        Self::from_json(LDAC_PROFILE_JSON, resolver)
    }

    /// Find the rule for a declared `@type`
    ///
    /// Tries the type as written, then its type aliases, then its
    /// path-leaf local name.
    pub fn lookup(&self, type_name: &str, resolver: &AliasResolver) -> Option<&ClassRule> {
        if let Some(rule) = self.rules.get(type_name) {
            return Some(rule);
        }
        let type_aliases = resolver.type_aliases(type_name);
        let leaf_aliases = resolver.property_aliases(type_name);
        type_aliases
            .iter()
            .chain(leaf_aliases.iter())
            .find_map(|alias| self.rules.get(alias.as_str()))
            .map(|rule| rule.as_ref())
    }

    /// Class names, sorted alphabetically
    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> (ProfileIndex, AliasResolver) {
        let resolver = AliasResolver::new();
        let index = ProfileIndex::ldac(&resolver).unwrap();
        (index, resolver)
    }

    #[test]
    fn test_ldac_profile_compiles() {
        let (index, _) = index();
        assert!(index.class_names().iter().any(|c| c == "RepositoryCollection"));
        assert!(index.class_names().iter().any(|c| c == "Language"));
    }

    #[test]
    fn test_only_required_inputs_are_kept() {
        let (index, resolver) = index();
        let rule = index.lookup("RepositoryCollection", &resolver).unwrap();
        let names: Vec<&str> = rule.inputs.iter().map(|i| i.primary_alias.as_str()).collect();
        assert_eq!(names, vec!["name", "description", "license"]);
    }

    #[test]
    fn test_alias_map_matches_every_spelling() {
        let (index, resolver) = index();
        let rule = index.lookup("Person", &resolver).unwrap();
        assert_eq!(
            rule.input_for_key("http://schema.org/name").map(|i| i.id.as_str()),
            Some("http://schema.org/name")
        );
        assert_eq!(
            rule.input_for_key("name").map(|i| i.id.as_str()),
            Some("http://schema.org/name")
        );
        assert!(rule.input_for_key("email").is_none());
    }

    #[test]
    fn test_lookup_by_type_alias() {
        let (index, resolver) = index();
        let by_uri = index
            .lookup("https://w3id.org/ldac/terms#RepositoryObject", &resolver)
            .unwrap();
        assert_eq!(by_uri.name, "RepositoryObject");
        let by_prefix = index.lookup("ldac:CollectionEvent", &resolver).unwrap();
        assert_eq!(by_prefix.name, "CollectionEvent");
        let by_path = index.lookup("http://schema.org/Person", &resolver).unwrap();
        assert_eq!(by_path.name, "Person");
        assert!(index.lookup("Unknown", &resolver).is_none());
    }

    #[test]
    fn test_class_registered_under_its_aliases() {
        let resolver = AliasResolver::new();
        let doc = r#"{"classes": {"ldac:Speaker": {"inputs": [
            {"id": "ldac:role", "required": true, "multiple": true}
        ]}}}"#;
        let index = ProfileIndex::from_json(doc, &resolver).unwrap();
        let rule = index.lookup("Speaker", &resolver).unwrap();
        assert_eq!(rule.name, "ldac:Speaker");
        assert_eq!(rule.inputs[0].primary_alias, "ldac:role");
        assert!(rule.input_for_key("https://w3id.org/ldac/terms#role").is_some());
        assert_eq!(rule.inputs[0].multiple, Some(true));
    }

    #[test]
    fn test_colliding_alias_keeps_first_input() {
        let resolver = AliasResolver::new();
        let doc = r#"{"classes": {"Agent": {"inputs": [
            {"id": "http://schema.org/name", "required": true},
            {"id": "http://xmlns.com/foaf/0.1/name", "required": true}
        ]}}}"#;
        let index = ProfileIndex::from_json(doc, &resolver).unwrap();
        let rule = index.lookup("Agent", &resolver).unwrap();
        assert_eq!(rule.inputs.len(), 2);
        assert_eq!(
            rule.input_for_key("name").map(|i| i.id.as_str()),
            Some("http://schema.org/name")
        );
        assert_eq!(
            rule.input_for_key("http://xmlns.com/foaf/0.1/name").map(|i| i.id.as_str()),
            Some("http://xmlns.com/foaf/0.1/name")
        );
    }

    #[test]
    fn test_class_names_sorted() {
        let (index, _) = index();
        let mut sorted = index.class_names().to_vec();
        sorted.sort();
        assert_eq!(index.class_names(), sorted.as_slice());
    }

    #[test]
    fn test_invalid_profile() {
        let resolver = AliasResolver::new();
        let result = ProfileIndex::from_json("{\"classes\": []}", &resolver);
        assert!(matches!(result, Err(ValidateError::InvalidProfile(_))));
    }
}
