//! Crate-level validation
//!
//! Runs the structural, language, license, hierarchy and profile checks
//! over a whole RO-Crate document and merges their findings into one
//! [`ValidationResult`].

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::alias::AliasResolver;
use crate::collect::{extract_id, has_any_type, has_type, is_file_entity};
use crate::entity::{validate_entity_languages, validate_file_license, ProfileCheck};
use crate::error::ValidateError;
use crate::hierarchy::validate_crate_hierarchy;
use crate::language::LanguageTracker;
use crate::profile::ProfileIndex;
use crate::structure::{graph_of, validate_structure};
use crate::vocab::{
    ENFORCED_CLASSES, ROOT_ENTITY_ID, TYPE_COLLECTION_EVENT, TYPE_DATASET, TYPE_REPOSITORY_OBJECT,
};

/// Options for validation
#[derive(Debug, Clone)]
pub struct ValidatorOptions {
    /// Profile classes whose required inputs are hard errors
    pub enforced_classes: BTreeSet<String>,
    /// Warn about language entities nothing references
    pub report_unused_languages: bool,
    /// Errors listed inline in a failure summary
    pub summary_limit: usize,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            enforced_classes: ENFORCED_CLASSES.iter().map(|c| c.to_string()).collect(),
            report_unused_languages: true,
            summary_limit: 10,
        }
    }
}

/// Outcome of validating one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn from_parts(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Multi-line failure message: the first `limit` errors, then a count
    /// of the rest
    pub fn failure_summary(&self, limit: usize) -> String {
        let mut lines: Vec<String> = self
            .errors
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, e)| format!("{}. {}", i + 1, e))
            .collect();
        if self.errors.len() > limit {
            lines.push(format!("...and {} more.", self.errors.len() - limit));
        }
        lines.join("\n")
    }

    /// Turn an invalid result into `ValidationFailed`, logging every error
    pub fn into_result(self, limit: usize) -> Result<Self, ValidateError> {
        if self.is_valid {
            return Ok(self);
        }
        for error in &self.errors {
            tracing::error!(%error, "RO-Crate validation error");
        }
        Err(ValidateError::ValidationFailed(self.failure_summary(limit)))
    }
}

/// Validates RO-Crate documents against RO-Crate structure and a profile
#[derive(Debug, Clone)]
pub struct Validator {
    resolver: Arc<AliasResolver>,
    profile: Arc<ProfileIndex>,
    options: ValidatorOptions,
}

impl Validator {
    pub fn new(
        resolver: Arc<AliasResolver>,
        profile: Arc<ProfileIndex>,
        options: ValidatorOptions,
    ) -> Self {
        Self {
            resolver,
            profile,
            options,
        }
    }

    /// Validator for the embedded LDAC profile with default options
    pub fn ldac() -> Result<Self, ValidateError> {
        let resolver = Arc::new(AliasResolver::new());
        let profile = Arc::new(ProfileIndex::ldac(&resolver)?);
        Ok(Self::new(resolver, profile, ValidatorOptions::default()))
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    pub fn resolver(&self) -> &AliasResolver {
        &self.resolver
    }

    /// Validate a document, tracking language usage from its own graph
    pub fn validate(&self, document: &Value) -> ValidationResult {
        match graph_of(document) {
            Ok(graph) => {
                let tracker = LanguageTracker::from_graph(graph, &self.resolver);
                self.validate_with_tracker(document, &tracker)
            }
            Err(fatal) => ValidationResult::from_parts(vec![fatal], Vec::new()),
        }
    }

    /// Validate a document with the language tracker of the run that
    /// produced it
    pub fn validate_with_tracker(
        &self,
        document: &Value,
        tracker: &LanguageTracker,
    ) -> ValidationResult {
        let graph = match graph_of(document) {
            Ok(graph) => graph,
            Err(fatal) => return ValidationResult::from_parts(vec![fatal], Vec::new()),
        };

        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let resolver = self.resolver.as_ref();

        validate_structure(document, graph, resolver, &mut errors, &mut warnings);

        let root = graph
            .iter()
            .find(|e| extract_id(e) == Some(ROOT_ENTITY_ID) && has_type(e, TYPE_DATASET, resolver));
        match root {
            Some(root) => validate_entity_languages(
                root,
                "Root Collection",
                resolver,
                &mut errors,
                &mut warnings,
            ),
            None => errors.push("No root collection found in @graph".to_string()),
        }

        for entity in graph {
            if has_any_type(
                entity,
                &[TYPE_REPOSITORY_OBJECT, TYPE_COLLECTION_EVENT],
                resolver,
            ) && !is_file_entity(entity, resolver)
            {
                let name = format!("Object {}", extract_id(entity).unwrap_or("<no @id>"));
                validate_entity_languages(entity, &name, resolver, &mut errors, &mut warnings);
            }
        }

        for file in graph.iter().filter(|e| is_file_entity(e, resolver)) {
            validate_file_license(file, resolver, &mut errors, &mut warnings);
        }

        validate_crate_hierarchy(graph, resolver, &mut errors, &mut warnings);

        let check = ProfileCheck {
            profile: &self.profile,
            resolver,
            enforced: &self.options.enforced_classes,
        };
        for entity in graph {
            check.validate_entity(entity, &entity_label(entity), &mut errors);
        }

        if self.options.report_unused_languages {
            if let Some(warning) = tracker.unused_warning() {
                warnings.push(warning);
            }
        }

        tracing::debug!(
            entities = graph.len(),
            errors = errors.len(),
            warnings = warnings.len(),
            "validated RO-Crate"
        );
        ValidationResult::from_parts(errors, warnings)
    }
}

fn entity_label(entity: &Value) -> String {
    match extract_id(entity) {
        Some(ROOT_ENTITY_ID) => "Root Collection".to_string(),
        Some(id) => format!("Entity \"{}\"", id),
        None => "Entity without @id".to_string(),
    }
}
