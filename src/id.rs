//! ID classification and syntax checks
//!
//! RO-Crate accepts a handful of `@id` shapes: relative forward-slash
//! paths, fragments, absolute URIs and blank nodes. Everything here works
//! on the raw string; nothing is resolved against a base.

use url::Url;

use crate::vocab::{is_descriptor_id, ROOT_ENTITY_ID};

/// Classification of an entity @id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// Root entity: "./"
    Root,
    /// Relative path: "./foo", "Sessions/s1/a.wav", "people/"
    Relative,
    /// Fragment identifier: "#person1", "#language_etr"
    Fragment,
    /// Blank node: "_:b0"
    BlankNode,
    /// Absolute URI: "https://...", "http://...", "urn:..."
    Absolute,
    /// Metadata descriptor: "ro-crate-metadata.json" or the legacy ".jsonld"
    MetadataDescriptor,
}

/// Classify an @id string
pub fn classify_id(id: &str) -> IdKind {
    if id == ROOT_ENTITY_ID {
        IdKind::Root
    } else if is_descriptor_id(id) {
        IdKind::MetadataDescriptor
    } else if id.starts_with('#') {
        IdKind::Fragment
    } else if id.starts_with("_:") {
        IdKind::BlankNode
    } else if id.starts_with("http://")
        || id.starts_with("https://")
        || id.starts_with("urn:")
        || id.starts_with("mailto:")
        || id.starts_with("arcp:")
    {
        IdKind::Absolute
    } else {
        IdKind::Relative
    }
}

/// Check the syntax of an @id
///
/// Returns the classification for an acceptable id, or a message fragment
/// describing why it is rejected.
pub fn check_id_syntax(id: &str) -> Result<IdKind, String> {
    if id.trim().is_empty() {
        return Err("is empty".to_string());
    }
    if id.contains('\\') {
        return Err("contains backslashes; use forward slashes in paths".to_string());
    }
    Ok(classify_id(id))
}

/// An `http(s)` id that cannot be parsed as a URL is syntactically
/// acceptable but will not dereference.
pub fn is_unparseable_web_id(id: &str) -> bool {
    (id.starts_with("http://") || id.starts_with("https://")) && Url::parse(id).is_err()
}

/// Directory-like ids end with '/', fragments are exempt
pub fn lacks_directory_slash(id: &str) -> bool {
    !id.starts_with('#') && !id.ends_with('/')
}
