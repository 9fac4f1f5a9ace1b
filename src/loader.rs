//! Loading RO-Crate documents
//!
//! Reads a crate's metadata file from a local file, a directory, a zip
//! archive or a URL and parses it into a JSON document. Validation itself
//! never touches the filesystem; this is the CLI's input edge.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use serde_json::Value;
use zip::ZipArchive;

use crate::error::ValidateError;
use crate::vocab::{LEGACY_METADATA_DESCRIPTOR_ID, METADATA_DESCRIPTOR_ID};

/// Source from which to load an RO-Crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrateSource {
    /// A metadata file
    File(PathBuf),
    /// A directory containing ro-crate-metadata.json
    Directory(PathBuf),
    /// A zip archive with the metadata at its root
    Zip(PathBuf),
    /// Remote URL (may or may not end with ro-crate-metadata.json)
    Url(String),
}

impl CrateSource {
    /// Work out the kind of source from a CLI argument
    pub fn detect(source: &str) -> Result<Self, ValidateError> {
        if source.starts_with("http://") || source.starts_with("https://") {
            return Ok(CrateSource::Url(source.to_string()));
        }
        let path = PathBuf::from(source);
        if path.is_dir() {
            Ok(CrateSource::Directory(path))
        } else if path.is_file() {
            let is_zip = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("zip"))
                .unwrap_or(false);
            if is_zip {
                Ok(CrateSource::Zip(path))
            } else {
                Ok(CrateSource::File(path))
            }
        } else {
            Err(ValidateError::InvalidPath(path))
        }
    }

    /// Human-readable origin for messages
    pub fn origin(&self) -> String {
        match self {
            CrateSource::File(p) | CrateSource::Directory(p) | CrateSource::Zip(p) => {
                p.display().to_string()
            }
            CrateSource::Url(u) => u.clone(),
        }
    }
}

/// Parse metadata JSON; the top level must be an object
pub fn parse_document(content: &str, origin: &str) -> Result<Value, ValidateError> {
    let value: Value = serde_json::from_str(content).map_err(|e| ValidateError::LoadError {
        path: origin.to_string(),
        reason: format!("Failed to parse JSON: {}", e),
    })?;
    if !value.is_object() {
        return Err(ValidateError::InvalidDocument(format!(
            "{}: top level must be a JSON object",
            origin
        )));
    }
    Ok(value)
}

/// Load and parse a document from any source
pub fn load_document(source: &CrateSource) -> Result<Value, ValidateError> {
    let (origin, content) = match source {
        CrateSource::File(path) => (path.display().to_string(), read_file(path)?),
        CrateSource::Directory(dir) => {
            let path = find_metadata_in_directory(dir)?;
            (path.display().to_string(), read_file(&path)?)
        }
        CrateSource::Zip(path) => load_from_zip(path)?,
        CrateSource::Url(url) => fetch_metadata_from_url(url)?,
    };
    tracing::debug!(%origin, bytes = content.len(), "loaded crate metadata");
    parse_document(&content, &origin)
}

fn read_file(path: &Path) -> Result<String, ValidateError> {
    std::fs::read_to_string(path).map_err(|e| ValidateError::LoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn is_metadata_name(name: &str) -> bool {
    name == METADATA_DESCRIPTOR_ID
        || name == LEGACY_METADATA_DESCRIPTOR_ID
        || name.ends_with("-ro-crate-metadata.json")
}

/// Find ro-crate-metadata.json (or a prefixed / legacy variant) in a directory
pub fn find_metadata_in_directory(path: &Path) -> Result<PathBuf, ValidateError> {
    // Try standard name first
    let standard = path.join(METADATA_DESCRIPTOR_ID);
    if standard.exists() {
        return Ok(standard);
    }

    let mut candidates: Vec<PathBuf> = std::fs::read_dir(path)?
        .flatten()
        .filter(|entry| entry.file_name().to_str().map(is_metadata_name).unwrap_or(false))
        .map(|entry| entry.path())
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| ValidateError::LoadError {
            path: path.display().to_string(),
            reason: "No ro-crate-metadata.json found".to_string(),
        })
}

/// Load the root metadata from a zip archive
/// Returns (origin, content)
pub fn load_from_zip(path: &Path) -> Result<(String, String), ValidateError> {
    let load_error = |reason: String| ValidateError::LoadError {
        path: path.display().to_string(),
        reason,
    };

    let file = File::open(path).map_err(|e| load_error(format!("Failed to open zip file: {}", e)))?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| load_error(format!("Failed to read zip archive: {}", e)))?;

    let entry_name = find_root_metadata_in_zip(&mut archive)
        .ok_or_else(|| load_error("No root ro-crate-metadata.json found in archive".to_string()))?;

    let mut content = String::new();
    archive
        .by_name(&entry_name)
        .map_err(|e| load_error(format!("Failed to extract {}: {}", entry_name, e)))?
        .read_to_string(&mut content)
        .map_err(|e| load_error(format!("Failed to read metadata file: {}", e)))?;

    Ok((format!("{}!/{}", path.display(), entry_name), content))
}

/// Find the root metadata entry in a zip archive
///
/// The metadata sits either at the archive root or, when a folder was
/// zipped, directly inside the single top-level directory.
fn find_root_metadata_in_zip<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Option<String> {
    let entries: Vec<String> = archive.file_names().map(String::from).collect();

    if let Some(entry) = entries
        .iter()
        .find(|e| !e.contains('/') && is_metadata_name(e))
    {
        return Some(entry.clone());
    }

    let top_level: std::collections::BTreeSet<&str> = entries
        .iter()
        .filter_map(|e| e.split('/').next())
        .filter(|s| !s.is_empty())
        .collect();
    if top_level.len() != 1 {
        return None;
    }
    let prefix = format!("{}/", top_level.into_iter().next()?);
    entries
        .iter()
        .filter_map(|e| e.strip_prefix(&prefix).map(|rest| (e, rest)))
        .find(|(_, rest)| !rest.contains('/') && is_metadata_name(rest))
        .map(|(e, _)| e.clone())
}

/// Fetch metadata from URL, trying /ro-crate-metadata.json if URL doesn't point to metadata
/// Returns (final_url, content)
pub fn fetch_metadata_from_url(url: &str) -> Result<(String, String), ValidateError> {
    if url.ends_with(METADATA_DESCRIPTOR_ID) || url.ends_with(LEGACY_METADATA_DESCRIPTOR_ID) {
        let content = fetch_url(url)?;
        return Ok((url.to_string(), content));
    }

    let metadata_url = format!("{}/{}", url.trim_end_matches('/'), METADATA_DESCRIPTOR_ID);
    if let Ok(content) = fetch_url(&metadata_url) {
        if content.trim_start().starts_with('{') {
            return Ok((metadata_url, content));
        }
    }

    // Maybe the URL is the metadata itself
    let content = fetch_url(url)?;
    if content.trim_start().starts_with('{') {
        Ok((url.to_string(), content))
    } else {
        Err(ValidateError::LoadError {
            path: url.to_string(),
            reason: "URL does not contain RO-Crate metadata".to_string(),
        })
    }
}

fn fetch_url(url: &str) -> Result<String, ValidateError> {
    let response = reqwest::blocking::get(url).map_err(|e| ValidateError::LoadError {
        path: url.to_string(),
        reason: format!("HTTP request failed: {}", e),
    })?;
    let response = response
        .error_for_status()
        .map_err(|e| ValidateError::LoadError {
            path: url.to_string(),
            reason: format!("HTTP error: {}", e),
        })?;
    response.text().map_err(|e| ValidateError::LoadError {
        path: url.to_string(),
        reason: format!("Failed to read response: {}", e),
    })
}
