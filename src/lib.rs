//! RO-Crate / LDAC Validation Library
//!
//! This library validates RO-Crate 1.2 documents against the base RO-Crate
//! structural rules and the LDAC (Language Data Commons) profile, and
//! writes validated crates to a project directory.
//!
//! # Overview
//!
//! A document is a JSON object with an `@context` and a flat `@graph` of
//! entities. Validation walks that graph once and reports:
//!
//! 1. Structural problems: missing `@context`, duplicate `@id`s, a missing
//!    or malformed metadata descriptor, invalid `@id` syntax
//! 2. LDAC language requirements on the root collection and repository objects
//! 3. Missing file licenses (warnings)
//! 4. Collection / object / file containment and one-directional relationships
//! 5. Required properties of every enforced profile class
//!
//! Malformed content never produces an `Err`; every problem becomes a string
//! in [`ValidationResult::errors`] or [`ValidationResult::warnings`].
//!
//! # Aliases
//!
//! The same property may appear as a full URI, a prefixed name or a bare
//! local name (`http://pcdm.org/models#memberOf`, `pcdm:memberOf`,
//! `memberOf`). The [`AliasResolver`] computes and caches those spellings.
//!
//! # Usage
//!
//! ## Validate a document
//!
//! ```ignore
//! use ldac_validate::{load_document, CrateSource, Validator};
//!
//! let document = load_document(&CrateSource::detect("path/to/crate")?)?;
//! let result = Validator::ldac()?.validate(&document);
//! for error in &result.errors {
//!     println!("{}", error);
//! }
//! ```
//!
//! ## Export with a validation gate
//!
//! ```ignore
//! use ldac_validate::{export_crate, LanguageTracker, Validator};
//!
//! let mut tracker = LanguageTracker::default();
//! let reference = tracker.get_language_reference("etr");
//! // ... build the document, track usage ...
//! export_crate(project_dir, &document, &Validator::ldac()?, &tracker)?;
//! ```

pub mod alias;
pub mod collect;
pub mod entity;
pub mod error;
pub mod hierarchy;
pub mod id;
pub mod language;
pub mod loader;
pub mod profile;
pub mod structure;
pub mod validate;
pub mod vocab;
pub mod writer;

// Re-export main types for convenience
pub use crate::alias::AliasResolver;
pub use crate::error::ValidateError;
pub use crate::language::{
    ensure_subject_language, BuiltinLanguageNames, LanguageNames, LanguageTracker,
};
pub use crate::loader::{load_document, parse_document, CrateSource};
pub use crate::profile::{ClassRule, ProfileIndex, RequiredInput};
pub use crate::validate::{ValidationResult, Validator, ValidatorOptions};
pub use crate::writer::{export_crate, remove_crate_files, write_crate, WrittenCrate};
