//! Collection / object / file hierarchy checks
//!
//! LDAC crates arrange entities in a PCDM-style containment tree:
//! `RepositoryCollection` →(hasMember/memberOf)→ `RepositoryObject`
//! →(hasPart/isPartOf)→ `File`. Files may also hang off a `Dataset`
//! that is `about` an object, one level removed from it.
//!
//! References are followed tolerantly: a reference to an id missing from
//! the graph still counts as "has the property" but is not checked further.
//! References under every spelling of a relation are combined.

use serde_json::Value;
use std::collections::HashMap;

use crate::alias::{Aliases, AliasResolver};
use crate::collect::{extract_id, has_type, is_file_entity, property_reference_ids};
use crate::vocab::{
    PCDM_HAS_MEMBER, PCDM_MEMBER_OF, SCHEMA_ABOUT, SCHEMA_HAS_PART, SCHEMA_IS_PART_OF,
    SCHEMA_SUBJECT_OF, SESSION_PATH_PREFIX, TYPE_DATASET, TYPE_REPOSITORY_COLLECTION,
    TYPE_REPOSITORY_OBJECT,
};

/// Alias sets of the relationship properties
struct Relations {
    member_of: Aliases,
    has_member: Aliases,
    has_part: Aliases,
    is_part_of: Aliases,
    subject_of: Aliases,
    about: Aliases,
}

impl Relations {
    fn new(resolver: &AliasResolver) -> Self {
        Self {
            member_of: resolver.property_aliases(PCDM_MEMBER_OF),
            has_member: resolver.property_aliases(PCDM_HAS_MEMBER),
            has_part: resolver.property_aliases(SCHEMA_HAS_PART),
            is_part_of: resolver.property_aliases(SCHEMA_IS_PART_OF),
            subject_of: resolver.property_aliases(SCHEMA_SUBJECT_OF),
            about: resolver.property_aliases(SCHEMA_ABOUT),
        }
    }
}

/// Entities indexed by id and sorted into the three hierarchy levels
struct CrateIndex<'a> {
    resolver: &'a AliasResolver,
    by_id: HashMap<&'a str, &'a Value>,
    collections: Vec<&'a Value>,
    objects: Vec<&'a Value>,
    files: Vec<&'a Value>,
}

impl<'a> CrateIndex<'a> {
    fn build(entities: &'a [Value], resolver: &'a AliasResolver) -> Self {
        let mut index = CrateIndex {
            resolver,
            by_id: HashMap::new(),
            collections: Vec::new(),
            objects: Vec::new(),
            files: Vec::new(),
        };
        for entity in entities {
            if let Some(id) = extract_id(entity) {
                index.by_id.entry(id).or_insert(entity);
            }
            if index.is(entity, TYPE_REPOSITORY_COLLECTION) {
                index.collections.push(entity);
            }
            if index.is(entity, TYPE_REPOSITORY_OBJECT) {
                index.objects.push(entity);
            }
            if is_file_entity(entity, resolver) {
                index.files.push(entity);
            }
        }
        index
    }

    fn get(&self, id: &str) -> Option<&'a Value> {
        self.by_id.get(id).copied()
    }

    fn is(&self, entity: &Value, type_name: &str) -> bool {
        has_type(entity, type_name, self.resolver)
    }
}

/// A session file parented to a Dataset should reach an object through
/// the Dataset's `about`. Session files are recognised by path prefix.
fn is_session_file(file_id: &str) -> bool {
    file_id.starts_with(SESSION_PATH_PREFIX)
}

/// Validate the collection/object/file hierarchy of a crate
pub fn validate_crate_hierarchy(
    entities: &[Value],
    resolver: &AliasResolver,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let rel = Relations::new(resolver);
    let index = CrateIndex::build(entities, resolver);

    check_objects(&index, &rel, errors, warnings);
    check_files(&index, &rel, errors, warnings);
    check_collection_members(&index, &rel, warnings);
    check_object_parts(&index, &rel, warnings);
}

fn check_objects(
    index: &CrateIndex<'_>,
    rel: &Relations,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    for object in &index.objects {
        let id = extract_id(object).unwrap_or("<no @id>");

        let parents = property_reference_ids(object, &rel.member_of);
        if parents.is_empty() {
            errors.push(format!(
                "RepositoryObject \"{}\" is missing pcdm:memberOf reference to a RepositoryCollection",
                id
            ));
        }
        for parent_id in parents {
            if let Some(parent) = index.get(parent_id) {
                if !index.is(parent, TYPE_REPOSITORY_COLLECTION) {
                    errors.push(format!(
                        "RepositoryObject \"{}\" is pcdm:memberOf \"{}\", which is not a RepositoryCollection",
                        id, parent_id
                    ));
                }
            }
        }

        if !has_direct_parts(object, rel) && !has_parts_through_dataset(object, index, rel) {
            warnings.push(format!(
                "RepositoryObject \"{}\" should have files: no hasPart, and no subjectOf Dataset with hasPart",
                id
            ));
        }
    }
}

fn has_direct_parts(object: &Value, rel: &Relations) -> bool {
    !property_reference_ids(object, &rel.has_part).is_empty()
}

fn has_parts_through_dataset(object: &Value, index: &CrateIndex<'_>, rel: &Relations) -> bool {
    property_reference_ids(object, &rel.subject_of)
        .into_iter()
        .filter_map(|id| index.get(id))
        .any(|dataset| index.is(dataset, TYPE_DATASET) && has_direct_parts(dataset, rel))
}

fn check_files(
    index: &CrateIndex<'_>,
    rel: &Relations,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    for file in &index.files {
        let id = extract_id(file).unwrap_or("<no @id>");

        let parents = property_reference_ids(file, &rel.is_part_of);
        if parents.is_empty() {
            errors.push(format!(
                "File \"{}\" is missing isPartOf reference to a RepositoryObject or Dataset",
                id
            ));
        }
        for parent_id in parents {
            let Some(parent) = index.get(parent_id) else {
                continue;
            };
            if index.is(parent, TYPE_REPOSITORY_OBJECT) {
                continue;
            }
            if index.is(parent, TYPE_DATASET) {
                if is_session_file(id) && !is_about_object(parent, index, rel) {
                    warnings.push(format!(
                        "File \"{}\" is part of Dataset \"{}\", which is not about any RepositoryObject",
                        id, parent_id
                    ));
                }
                continue;
            }
            errors.push(format!(
                "File \"{}\" isPartOf \"{}\", which is neither a RepositoryObject nor a Dataset",
                id, parent_id
            ));
        }
    }
}

fn is_about_object(dataset: &Value, index: &CrateIndex<'_>, rel: &Relations) -> bool {
    property_reference_ids(dataset, &rel.about)
        .into_iter()
        .filter_map(|id| index.get(id))
        .any(|target| index.is(target, TYPE_REPOSITORY_OBJECT))
}

/// hasMember on a collection should be mirrored by memberOf on the member
fn check_collection_members(index: &CrateIndex<'_>, rel: &Relations, warnings: &mut Vec<String>) {
    for collection in &index.collections {
        let Some(collection_id) = extract_id(collection) else {
            continue;
        };
        for member_id in property_reference_ids(collection, &rel.has_member) {
            let Some(member) = index.get(member_id) else {
                continue;
            };
            let back = property_reference_ids(member, &rel.member_of);
            if !back.contains(&collection_id) {
                warnings.push(format!(
                    "RepositoryCollection \"{}\" lists \"{}\" in pcdm:hasMember, but \"{}\" has no pcdm:memberOf back-reference",
                    collection_id, member_id, member_id
                ));
            }
        }
    }
}

/// hasPart on an object should be mirrored by isPartOf on the file
fn check_object_parts(index: &CrateIndex<'_>, rel: &Relations, warnings: &mut Vec<String>) {
    for object in &index.objects {
        let Some(object_id) = extract_id(object) else {
            continue;
        };
        for part_id in property_reference_ids(object, &rel.has_part) {
            let Some(part) = index.get(part_id) else {
                continue;
            };
            let back = property_reference_ids(part, &rel.is_part_of);
            if !back.contains(&object_id) {
                warnings.push(format!(
                    "RepositoryObject \"{}\" lists \"{}\" in hasPart, but \"{}\" has no isPartOf back-reference",
                    object_id, part_id, part_id
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(entities: &[Value]) -> (Vec<String>, Vec<String>) {
        let resolver = AliasResolver::new();
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        validate_crate_hierarchy(entities, &resolver, &mut errors, &mut warnings);
        (errors, warnings)
    }

    fn mentions(messages: &[String], a: &str, b: &str) -> usize {
        messages
            .iter()
            .filter(|m| m.contains(a) && m.contains(b))
            .count()
    }

    fn well_formed() -> Vec<Value> {
        vec![
            json!({
                "@id": "./",
                "@type": ["Dataset", "RepositoryCollection"],
                "pcdm:hasMember": [{"@id": "#session-s1"}]
            }),
            json!({
                "@id": "#session-s1",
                "@type": ["RepositoryObject", "CollectionEvent"],
                "pcdm:memberOf": {"@id": "./"},
                "hasPart": [{"@id": "Sessions/s1/a.wav"}]
            }),
            json!({
                "@id": "Sessions/s1/a.wav",
                "@type": ["File", "AudioObject"],
                "isPartOf": {"@id": "#session-s1"}
            }),
        ]
    }

    #[test]
    fn test_well_formed_hierarchy() {
        let (errors, warnings) = run(&well_formed());
        assert!(errors.is_empty(), "{:?}", errors);
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn test_object_without_member_of() {
        let (errors, _) = run(&[json!({
            "@id": "#o",
            "@type": "RepositoryObject",
            "hasPart": [{"@id": "missing.wav"}]
        })]);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("\"#o\" is missing pcdm:memberOf"));
    }

    #[test]
    fn test_object_member_of_wrong_type() {
        let (errors, _) = run(&[
            json!({"@id": "#p", "@type": "Person"}),
            json!({
                "@id": "#o",
                "@type": "RepositoryObject",
                "memberOf": "#p",
                "hasPart": [{"@id": "x.wav"}]
            }),
        ]);
        assert_eq!(mentions(&errors, "#o", "#p"), 1);
    }

    #[test]
    fn test_unresolvable_reference_satisfies_presence() {
        let (errors, _) = run(&[json!({
            "@id": "#o",
            "@type": "RepositoryObject",
            "http://pcdm.org/models#memberOf": {"@id": "https://elsewhere.org/c"},
            "hasPart": [{"@id": "x.wav"}]
        })]);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_object_files_through_subject_of_dataset() {
        let mut graph = vec![
            json!({"@id": "./", "@type": ["Dataset", "RepositoryCollection"]}),
            json!({
                "@id": "#o",
                "@type": "RepositoryObject",
                "memberOf": {"@id": "./"},
                "subjectOf": {"@id": "Sessions/s1/"}
            }),
            json!({
                "@id": "Sessions/s1/",
                "@type": "Dataset",
                "about": {"@id": "#o"},
                "hasPart": [{"@id": "Sessions/s1/a.wav"}]
            }),
        ];
        let (_, warnings) = run(&graph);
        assert!(warnings.iter().all(|w| !w.contains("should have files")));

        graph[2] = json!({"@id": "Sessions/s1/", "@type": "Dataset", "hasPart": []});
        let (_, warnings) = run(&graph);
        assert_eq!(
            warnings.iter().filter(|w| w.contains("should have files")).count(),
            1
        );
    }

    #[test]
    fn test_file_without_is_part_of() {
        let (errors, _) = run(&[json!({"@id": "a.wav", "@type": "File"})]);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("\"a.wav\" is missing isPartOf"));
    }

    #[test]
    fn test_session_file_under_dataset_without_about() {
        let graph = vec![
            json!({"@id": "Sessions/s1/", "@type": "Dataset"}),
            json!({
                "@id": "Sessions/s1/a.wav",
                "@type": "File",
                "isPartOf": {"@id": "Sessions/s1/"}
            }),
            json!({
                "@id": "People/p1/consent.pdf",
                "@type": "File",
                "isPartOf": {"@id": "Sessions/s1/"}
            }),
        ];
        let (errors, warnings) = run(&graph);
        assert!(errors.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Sessions/s1/a.wav"));
    }

    #[test]
    fn test_session_file_under_dataset_about_object() {
        let graph = vec![
            json!({"@id": "./", "@type": ["Dataset", "RepositoryCollection"]}),
            json!({
                "@id": "#session-s1",
                "@type": "RepositoryObject",
                "memberOf": {"@id": "./"},
                "subjectOf": {"@id": "Sessions/s1/"}
            }),
            json!({
                "@id": "Sessions/s1/",
                "@type": "Dataset",
                "about": {"@id": "#session-s1"},
                "hasPart": [{"@id": "Sessions/s1/a.wav"}]
            }),
            json!({
                "@id": "Sessions/s1/a.wav",
                "@type": "File",
                "isPartOf": {"@id": "Sessions/s1/"}
            }),
        ];
        let (errors, warnings) = run(&graph);
        assert!(errors.is_empty(), "{:?}", errors);
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn test_empty_spelling_does_not_hide_reference() {
        let (errors, _) = run(&[
            json!({"@id": "./", "@type": ["Dataset", "RepositoryCollection"]}),
            json!({
                "@id": "#o",
                "@type": "RepositoryObject",
                "http://pcdm.org/models#memberOf": [],
                "memberOf": {"@id": "./"},
                "hasPart": [{"@id": "x.wav"}]
            }),
        ]);
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn test_file_part_of_wrong_type() {
        let (errors, _) = run(&[
            json!({"@id": "#p", "@type": "Person"}),
            json!({"@id": "a.wav", "@type": "File", "isPartOf": "#p"}),
        ]);
        assert_eq!(mentions(&errors, "a.wav", "#p"), 1);
    }

    #[test]
    fn test_missing_member_back_reference() {
        let mut graph = well_formed();
        graph[1].as_object_mut().unwrap().remove("pcdm:memberOf");
        let (_, warnings) = run(&graph);
        assert_eq!(mentions(&warnings, "./", "#session-s1"), 1);

        let (_, warnings) = run(&well_formed());
        assert_eq!(mentions(&warnings, "./", "#session-s1"), 0);
    }

    #[test]
    fn test_missing_part_back_reference() {
        let mut graph = well_formed();
        graph[2]["isPartOf"] = json!({"@id": "./"});
        let (_, warnings) = run(&graph);
        assert_eq!(mentions(&warnings, "#session-s1", "Sessions/s1/a.wav"), 1);
    }
}
