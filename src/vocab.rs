//! Vocabulary definitions for RO-Crate and the LDAC profile
//!
//! Canonical identifiers for the properties and types the validators
//! reason about, plus the namespace hints used to derive prefixed aliases.

/// RO-Crate context/profile URL prefix
pub const ROCRATE_PROFILE_PREFIX: &str = "https://w3id.org/ro/crate/";

/// Standard metadata descriptor filename
pub const METADATA_DESCRIPTOR_ID: &str = "ro-crate-metadata.json";

/// Legacy metadata descriptor filename
pub const LEGACY_METADATA_DESCRIPTOR_ID: &str = "ro-crate-metadata.jsonld";

/// HTML preview filename
pub const PREVIEW_FILE_NAME: &str = "ro-crate-preview.html";

/// Root entity ID
pub const ROOT_ENTITY_ID: &str = "./";

/// Prefix of language entity ids created by the language tracker
pub const LANGUAGE_ID_PREFIX: &str = "#language_";

/// File ids under this prefix belong to a session
pub const SESSION_PATH_PREFIX: &str = "Sessions/";

pub const LDAC_TERMS: &str = "https://w3id.org/ldac/terms#";
pub const PCDM_MODELS: &str = "http://pcdm.org/models#";

pub const LDAC_SUBJECT_LANGUAGE: &str = "https://w3id.org/ldac/terms#subjectLanguage";
pub const PCDM_MEMBER_OF: &str = "http://pcdm.org/models#memberOf";
pub const PCDM_HAS_MEMBER: &str = "http://pcdm.org/models#hasMember";
pub const SCHEMA_HAS_PART: &str = "http://schema.org/hasPart";
pub const SCHEMA_IS_PART_OF: &str = "http://schema.org/isPartOf";
pub const SCHEMA_SUBJECT_OF: &str = "http://schema.org/subjectOf";
pub const SCHEMA_ABOUT: &str = "http://schema.org/about";
pub const SCHEMA_LICENSE: &str = "http://schema.org/license";

pub const TYPE_DATASET: &str = "Dataset";
pub const TYPE_REPOSITORY_COLLECTION: &str = "RepositoryCollection";
pub const TYPE_REPOSITORY_OBJECT: &str = "RepositoryObject";
pub const TYPE_COLLECTION_EVENT: &str = "CollectionEvent";
pub const TYPE_FILE: &str = "File";
pub const TYPE_LANGUAGE: &str = "Language";
pub const TYPE_CREATIVE_WORK: &str = "CreativeWork";

/// Types treated as files: `File` and the schema.org media types it aliases
pub const FILE_TYPES: &[&str] = &[
    TYPE_FILE,
    "AudioObject",
    "VideoObject",
    "ImageObject",
    "DigitalDocument",
];

/// Classes whose required inputs produce hard errors
pub const ENFORCED_CLASSES: &[&str] = &[
    "Dataset",
    "RepositoryCollection",
    "RepositoryObject",
    "File",
    "Person",
    "Organization",
    "Place",
    "Language",
    "CollectionEvent",
];

/// A namespace whose identifiers also get a short `prefix:local` alias
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceHint {
    /// Substring identifying the namespace inside a full URI
    pub marker: &'static str,
    /// Short prefix, without the colon
    pub prefix: &'static str,
    /// Base URI the prefix expands to
    pub base: &'static str,
}

/// Known namespaces. schema.org terms are bare names in the RO-Crate
/// context and get no prefix.
pub const NAMESPACE_HINTS: &[NamespaceHint] = &[
    NamespaceHint {
        marker: "w3id.org/ldac/terms",
        prefix: "ldac",
        base: LDAC_TERMS,
    },
    NamespaceHint {
        marker: "pcdm.org/models",
        prefix: "pcdm",
        base: PCDM_MODELS,
    },
    NamespaceHint {
        marker: "purl.org/dc/terms",
        prefix: "dct",
        base: "http://purl.org/dc/terms/",
    },
];

/// Look up a namespace hint by its short prefix
pub fn hint_for_prefix(prefix: &str) -> Option<&'static NamespaceHint> {
    NAMESPACE_HINTS.iter().find(|h| h.prefix == prefix)
}

/// Check whether an id names a metadata descriptor
pub fn is_descriptor_id(id: &str) -> bool {
    id == METADATA_DESCRIPTOR_ID || id == LEGACY_METADATA_DESCRIPTOR_ID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_for_prefix() {
        assert_eq!(hint_for_prefix("ldac").map(|h| h.base), Some(LDAC_TERMS));
        assert!(hint_for_prefix("schema").is_none());
    }

    #[test]
    fn test_is_descriptor_id() {
        assert!(is_descriptor_id("ro-crate-metadata.json"));
        assert!(is_descriptor_id("ro-crate-metadata.jsonld"));
        assert!(!is_descriptor_id("./ro-crate-metadata.json"));
    }
}
