//! Alias resolution for property and type identifiers
//!
//! The same logical property can appear in a graph as a full URI
//! (`https://w3id.org/ldac/terms#subjectLanguage`), a prefixed name
//! (`ldac:subjectLanguage`) or a bare local name (`subjectLanguage`).
//! Identifiers are treated as opaque strings; an alias set is the list of
//! spellings considered equivalent to one canonical identifier.
//!
//! Alias sets are pure functions of the identifier and are memoized per
//! resolver. The caches are never invalidated.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::vocab::{hint_for_prefix, NAMESPACE_HINTS};

/// Shared, immutable alias list
pub type Aliases = Arc<[String]>;

/// Memoizing alias resolver
#[derive(Debug, Default)]
pub struct AliasResolver {
    type_cache: Mutex<HashMap<String, Aliases>>,
    property_cache: Mutex<HashMap<String, Aliases>>,
}

impl AliasResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide resolver, created on first use
    pub fn shared() -> &'static AliasResolver {
        static SHARED: OnceLock<AliasResolver> = OnceLock::new();
        SHARED.get_or_init(AliasResolver::new)
    }

    /// Spellings under which a type name may appear in `@type`
    pub fn type_aliases(&self, type_name: &str) -> Aliases {
        cached(&self.type_cache, type_name, compute_type_aliases)
    }

    /// Spellings under which a property may appear as an entity key
    pub fn property_aliases(&self, property_id: &str) -> Aliases {
        cached(&self.property_cache, property_id, compute_property_aliases)
    }

    /// Human-readable name for a property, used in messages
    pub fn preferred_alias(&self, property_id: &str) -> String {
        preferred_of(&self.property_aliases(property_id), property_id)
    }
}

fn cached(
    cache: &Mutex<HashMap<String, Aliases>>,
    key: &str,
    compute: fn(&str) -> Vec<String>,
) -> Aliases {
    let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(hit) = cache.get(key) {
        return Arc::clone(hit);
    }
    let aliases: Aliases = compute(key).into();
    cache.insert(key.to_string(), Arc::clone(&aliases));
    aliases
}

/// Compute type aliases: the name, its hash-fragment local name, and the
/// local part of a prefixed name
pub fn compute_type_aliases(type_name: &str) -> Vec<String> {
    let mut aliases = vec![type_name.to_string()];

    if let Some((_, local)) = type_name.rsplit_once('#') {
        aliases.push(local.to_string());
    }
    if let Some((_, local)) = split_prefixed(type_name) {
        aliases.push(local.to_string());
    }

    dedup(aliases)
}

/// Compute property aliases
///
/// - the id itself
/// - its local name, after the last `#` or else after the last `/`
/// - `prefix:local` for every namespace hint whose marker occurs in the id
///
/// Ids without `#` or `/` fall back to the prefixed-name form: the local
/// part, plus the full URI when the prefix is a known namespace.
pub fn compute_property_aliases(property_id: &str) -> Vec<String> {
    let mut aliases = vec![property_id.to_string()];

    let local = property_id
        .rsplit_once('#')
        .or_else(|| property_id.rsplit_once('/'))
        .map(|(_, local)| local)
        .filter(|local| !local.is_empty());

    match local {
        Some(local) => {
            aliases.push(local.to_string());
            for hint in NAMESPACE_HINTS {
                if property_id.contains(hint.marker) {
                    aliases.push(format!("{}:{}", hint.prefix, local));
                }
            }
        }
        None => {
            if let Some((prefix, local)) = split_prefixed(property_id) {
                aliases.push(local.to_string());
                if let Some(hint) = hint_for_prefix(prefix) {
                    aliases.push(format!("{}{}", hint.base, local));
                }
            }
        }
    }

    dedup(aliases)
}

/// Split `prefix:local`, ignoring URIs
fn split_prefixed(id: &str) -> Option<(&str, &str)> {
    if id.starts_with("http") {
        return None;
    }
    id.split_once(':')
}

fn is_prefixed_name(alias: &str) -> bool {
    match split_prefixed(alias) {
        Some((prefix, local)) => {
            !prefix.is_empty()
                && prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                && !local.is_empty()
                && !local.starts_with("//")
        }
        None => false,
    }
}

fn is_bare_name(alias: &str) -> bool {
    !alias.is_empty() && !alias.contains([':', '/', '#'])
}

/// Pick the message-friendly alias: a prefixed name, else a bare local
/// name, else the raw id
pub fn preferred_of(aliases: &[String], fallback: &str) -> String {
    aliases
        .iter()
        .find(|a| is_prefixed_name(a))
        .or_else(|| aliases.iter().find(|a| is_bare_name(a)))
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}

fn dedup(aliases: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(aliases.len());
    for alias in aliases {
        if !alias.is_empty() && !out.contains(&alias) {
            out.push(alias);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_aliases_ldac_uri() {
        let aliases = compute_property_aliases("https://w3id.org/ldac/terms#subjectLanguage");
        assert_eq!(
            aliases,
            vec![
                "https://w3id.org/ldac/terms#subjectLanguage",
                "subjectLanguage",
                "ldac:subjectLanguage"
            ]
        );
    }

    #[test]
    fn test_property_aliases_schema_path_leaf() {
        let aliases = compute_property_aliases("http://schema.org/name");
        assert_eq!(aliases, vec!["http://schema.org/name", "name"]);
    }

    #[test]
    fn test_property_aliases_prefixed_expands_known_namespace() {
        let aliases = compute_property_aliases("pcdm:memberOf");
        assert_eq!(
            aliases,
            vec!["pcdm:memberOf", "memberOf", "http://pcdm.org/models#memberOf"]
        );

        let unknown = compute_property_aliases("foo:bar");
        assert_eq!(unknown, vec!["foo:bar", "bar"]);
    }

    #[test]
    fn test_plain_identifier_aliases_only_itself() {
        assert_eq!(compute_property_aliases("name"), vec!["name"]);
        assert_eq!(compute_type_aliases("Person"), vec!["Person"]);
    }

    #[test]
    fn test_type_aliases() {
        assert_eq!(
            compute_type_aliases("https://w3id.org/ldac/terms#RepositoryObject"),
            vec!["https://w3id.org/ldac/terms#RepositoryObject", "RepositoryObject"]
        );
        assert_eq!(
            compute_type_aliases("ldac:CollectionEvent"),
            vec!["ldac:CollectionEvent", "CollectionEvent"]
        );
    }

    #[test]
    fn test_aliases_always_contain_input_and_are_cached() {
        let resolver = AliasResolver::new();
        for id in [
            "https://w3id.org/ldac/terms#subjectLanguage",
            "http://schema.org/",
            "ldac:subjectLanguage",
            "x",
        ] {
            let first = resolver.property_aliases(id);
            assert!(first.iter().any(|a| a == id));
            let second = resolver.property_aliases(id);
            assert!(Arc::ptr_eq(&first, &second));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_shared_resolver() {
        let first = AliasResolver::shared();
        assert!(std::ptr::eq(first, AliasResolver::shared()));
        let aliases = first.property_aliases("pcdm:hasMember");
        assert!(Arc::ptr_eq(&aliases, &first.property_aliases("pcdm:hasMember")));
    }

    #[test]
    fn test_preferred_alias() {
        let resolver = AliasResolver::new();
        assert_eq!(
            resolver.preferred_alias("https://w3id.org/ldac/terms#subjectLanguage"),
            "ldac:subjectLanguage"
        );
        assert_eq!(resolver.preferred_alias("http://schema.org/name"), "name");
        assert_eq!(resolver.preferred_alias("pcdm:memberOf"), "pcdm:memberOf");
        assert_eq!(
            resolver.preferred_alias("http://schema.org/"),
            "http://schema.org/"
        );
    }
}
