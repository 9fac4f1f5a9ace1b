//! Language entity registry and usage tracking
//!
//! One tracker lives for one export or validation run. It creates each
//! `#language_<code>` entity at most once and records which entities
//! reference it, so unused language entities can be reported.

use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::alias::AliasResolver;
use crate::collect::{
    extract_id, find_property, get_referenced_ids, has_type, reference_ids,
};
use crate::vocab::{LANGUAGE_ID_PREFIX, LDAC_SUBJECT_LANGUAGE, TYPE_LANGUAGE};

/// Language-name lookup used when creating language entities
pub trait LanguageNames {
    /// Display name for a code, `None` when unknown
    fn name_for(&self, code: &str) -> Option<String>;
}

impl<F> LanguageNames for F
where
    F: Fn(&str) -> Option<String>,
{
    fn name_for(&self, code: &str) -> Option<String> {
        self(code)
    }
}

/// Small ISO 639-3 table for codes common in field archives
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLanguageNames;

const BUILTIN_NAMES: &[(&str, &str)] = &[
    ("und", "Undetermined"),
    ("mul", "Multiple languages"),
    ("zxx", "No linguistic content"),
    ("eng", "English"),
    ("fra", "French"),
    ("deu", "German"),
    ("spa", "Spanish"),
    ("por", "Portuguese"),
    ("ind", "Indonesian"),
    ("tpi", "Tok Pisin"),
    ("bis", "Bislama"),
    ("swh", "Swahili"),
    ("etr", "Edolo"),
];

impl LanguageNames for BuiltinLanguageNames {
    fn name_for(&self, code: &str) -> Option<String> {
        BUILTIN_NAMES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, name)| name.to_string())
    }
}

/// Id of the language entity for a code
pub fn language_id(code: &str) -> String {
    format!("{}{}", LANGUAGE_ID_PREFIX, code)
}

/// Registry of language entities created during one run
pub struct LanguageTracker {
    names: Box<dyn LanguageNames>,
    entities: BTreeMap<String, Value>,
    usage: BTreeMap<String, BTreeSet<String>>,
}

impl std::fmt::Debug for LanguageTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageTracker")
            .field("entities", &self.entities.keys().collect::<Vec<_>>())
            .field("usage", &self.usage)
            .finish()
    }
}

impl Default for LanguageTracker {
    fn default() -> Self {
        Self::new(BuiltinLanguageNames)
    }
}

impl LanguageTracker {
    pub fn new(names: impl LanguageNames + 'static) -> Self {
        Self {
            names: Box::new(names),
            entities: BTreeMap::new(),
            usage: BTreeMap::new(),
        }
    }

    /// Seed a tracker from an existing graph
    ///
    /// Registers the `#language_<code>` entities already present and
    /// records every other entity that references one of them, whether by
    /// `{"@id": ...}` object (extra keys allowed) or by bare id string.
    pub fn from_graph(entities: &[Value], resolver: &AliasResolver) -> Self {
        let mut tracker = Self::default();

        for entity in entities {
            let Some(id) = extract_id(entity) else {
                continue;
            };
            let Some(code) = id.strip_prefix(LANGUAGE_ID_PREFIX) else {
                continue;
            };
            if has_type(entity, TYPE_LANGUAGE, resolver) && !tracker.entities.contains_key(code) {
                tracker.entities.insert(code.to_string(), entity.clone());
            }
        }

        for entity in entities {
            let Some(referrer) = extract_id(entity) else {
                continue;
            };
            let mut targets = get_referenced_ids(entity);
            if let Some(obj) = entity.as_object() {
                for (key, value) in obj {
                    if key != "@id" && key != "@type" {
                        targets.extend(reference_ids(value).into_iter().map(String::from));
                    }
                }
            }
            for target in &targets {
                if let Some(code) = target.strip_prefix(LANGUAGE_ID_PREFIX) {
                    if target != referrer && tracker.entities.contains_key(code) {
                        tracker.track_usage(code, referrer);
                    }
                }
            }
        }

        tracker
    }

    /// Get or create the language entity for a code
    pub fn get_language_entity(&mut self, code: &str) -> &Value {
        let names = &self.names;
        self.entities.entry(code.to_string()).or_insert_with(|| {
            let name = names.name_for(code).unwrap_or_else(|| code.to_string());
            json!({
                "@id": language_id(code),
                "@type": TYPE_LANGUAGE,
                "code": code,
                "name": name
            })
        })
    }

    /// `{"@id": "#language_<code>"}`, creating the entity if needed
    pub fn get_language_reference(&mut self, code: &str) -> Value {
        self.get_language_entity(code);
        json!({ "@id": language_id(code) })
    }

    /// Record that `referencing_id` references the language `code`
    pub fn track_usage(&mut self, code: &str, referencing_id: &str) {
        self.usage
            .entry(code.to_string())
            .or_default()
            .insert(referencing_id.to_string());
    }

    /// Number of distinct entities referencing a code
    pub fn usage_count(&self, code: &str) -> usize {
        self.usage.get(code).map(BTreeSet::len).unwrap_or(0)
    }

    /// Created language entities nobody references
    pub fn unused_language_entities(&self) -> Vec<&Value> {
        self.entities
            .iter()
            .filter(|(code, _)| self.usage_count(code) == 0)
            .map(|(_, entity)| entity)
            .collect()
    }

    /// All language entities, in code order
    pub fn language_entities(&self) -> impl Iterator<Item = &Value> {
        self.entities.values()
    }

    /// Warning for unused language entities, if there are any
    pub fn unused_warning(&self) -> Option<String> {
        let unused: Vec<&str> = self
            .unused_language_entities()
            .into_iter()
            .filter_map(extract_id)
            .collect();
        if unused.is_empty() {
            return None;
        }
        Some(format!(
            "Found {} unused language entities: {}",
            unused.len(),
            unused.join(", ")
        ))
    }
}

/// Make sure an entity has a non-empty `ldac:subjectLanguage` list
///
/// Missing values become an empty list, scalars are wrapped, and an empty
/// list is filled with references to `default_codes`, each tracked as used
/// by the entity. Calling it again is a no-op.
pub fn ensure_subject_language(
    entity: &mut Value,
    tracker: &mut LanguageTracker,
    default_codes: &[&str],
    resolver: &AliasResolver,
) {
    let aliases = resolver.property_aliases(LDAC_SUBJECT_LANGUAGE);
    let key = find_property(entity, &aliases)
        .map(|(key, _)| key.to_string())
        .unwrap_or_else(|| resolver.preferred_alias(LDAC_SUBJECT_LANGUAGE));
    let owner = extract_id(entity).unwrap_or_default().to_string();

    let Some(obj) = entity.as_object_mut() else {
        return;
    };
    let slot = obj.entry(key).or_insert_with(|| Value::Array(Vec::new()));
    if !slot.is_array() {
        let single = slot.take();
        *slot = Value::Array(vec![single]);
    }

    if let Value::Array(items) = slot {
        if items.is_empty() {
            for code in default_codes {
                items.push(tracker.get_language_reference(code));
                tracker.track_usage(code, &owner);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_entity_created_once() {
        let mut tracker = LanguageTracker::default();
        let first = tracker.get_language_entity("etr").clone();
        assert_eq!(
            first,
            json!({"@id": "#language_etr", "@type": "Language", "code": "etr", "name": "Edolo"})
        );
        tracker.get_language_entity("etr");
        assert_eq!(tracker.language_entities().count(), 1);
    }

    #[test]
    fn test_unknown_code_falls_back_to_code() {
        let mut tracker = LanguageTracker::new(|_: &str| -> Option<String> { None });
        let entity = tracker.get_language_entity("qaa");
        assert_eq!(entity["name"], "qaa");
    }

    #[test]
    fn test_injected_lookup() {
        let mut tracker =
            LanguageTracker::new(|code: &str| (code == "nru").then(|| "Narua".to_string()));
        assert_eq!(tracker.get_language_entity("nru")["name"], "Narua");
    }

    #[test]
    fn test_reference_ensures_entity() {
        let mut tracker = LanguageTracker::default();
        let reference = tracker.get_language_reference("eng");
        assert_eq!(reference, json!({"@id": "#language_eng"}));
        assert_eq!(tracker.language_entities().count(), 1);
    }

    #[test]
    fn test_usage_is_idempotent_per_pair() {
        let mut tracker = LanguageTracker::default();
        tracker.track_usage("etr", "#s1");
        tracker.track_usage("etr", "#s1");
        tracker.track_usage("etr", "#s2");
        assert_eq!(tracker.usage_count("etr"), 2);
        assert_eq!(tracker.usage_count("eng"), 0);
    }

    #[test]
    fn test_unused_language_entities() {
        let mut tracker = LanguageTracker::default();
        tracker.get_language_reference("etr");
        tracker.get_language_reference("eng");
        tracker.track_usage("etr", "#s1");

        let unused = tracker.unused_language_entities();
        assert_eq!(unused.len(), 1);
        assert_eq!(unused[0]["@id"], "#language_eng");
        assert_eq!(
            tracker.unused_warning().as_deref(),
            Some("Found 1 unused language entities: #language_eng")
        );
    }

    #[test]
    fn test_ensure_subject_language_defaults() {
        let resolver = AliasResolver::new();
        let mut tracker = LanguageTracker::default();
        let mut entity = json!({"@id": "#s1", "@type": "RepositoryObject"});

        ensure_subject_language(&mut entity, &mut tracker, &["und"], &resolver);
        assert_eq!(
            entity["ldac:subjectLanguage"],
            json!([{"@id": "#language_und"}])
        );
        assert_eq!(tracker.usage_count("und"), 1);

        let once = entity.clone();
        ensure_subject_language(&mut entity, &mut tracker, &["und"], &resolver);
        assert_eq!(entity, once);
        assert_eq!(tracker.usage_count("und"), 1);
    }

    #[test]
    fn test_ensure_subject_language_wraps_scalar() {
        let resolver = AliasResolver::new();
        let mut tracker = LanguageTracker::default();
        let mut entity = json!({"@id": "#s1", "subjectLanguage": {"@id": "#language_etr"}});

        ensure_subject_language(&mut entity, &mut tracker, &["und"], &resolver);
        assert_eq!(entity["subjectLanguage"], json!([{"@id": "#language_etr"}]));
        assert!(entity.get("ldac:subjectLanguage").is_none());
        assert_eq!(tracker.language_entities().count(), 0);
    }

    #[test]
    fn test_from_graph() {
        let graph = vec![
            json!({"@id": "./", "ldac:subjectLanguage": [{"@id": "#language_etr"}]}),
            json!({"@id": "#language_etr", "@type": "Language", "code": "etr", "name": "Edolo"}),
            json!({"@id": "#language_eng", "@type": "Language", "code": "eng", "name": "English"}),
        ];
        let tracker = LanguageTracker::from_graph(&graph, &AliasResolver::new());
        assert_eq!(tracker.usage_count("etr"), 1);
        assert_eq!(
            tracker.unused_warning().as_deref(),
            Some("Found 1 unused language entities: #language_eng")
        );
    }

    #[test]
    fn test_from_graph_tolerates_reference_shapes() {
        let graph = vec![
            json!({"@id": "#s1", "inLanguage": {"@id": "#language_etr", "name": "Edolo"}}),
            json!({"@id": "#s2", "ldac:subjectLanguage": ["#language_eng"]}),
            json!({"@id": "#s3", "ldac:subjectLanguage": "#language_fra"}),
            json!({"@id": "#language_etr", "@type": "Language", "code": "etr", "name": "Edolo"}),
            json!({"@id": "#language_eng", "@type": "Language", "code": "eng", "name": "English"}),
            json!({"@id": "#language_fra", "@type": "Language", "code": "fra", "name": "French"}),
        ];
        let tracker = LanguageTracker::from_graph(&graph, &AliasResolver::new());
        assert_eq!(tracker.usage_count("etr"), 1);
        assert_eq!(tracker.usage_count("eng"), 1);
        assert_eq!(tracker.usage_count("fra"), 1);
        assert!(tracker.unused_warning().is_none());
    }
}
