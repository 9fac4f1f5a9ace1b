//! Writing crate files into a project directory
//!
//! Produces `ro-crate-metadata.json` and a static `ro-crate-preview.html`.
//! An existing output file is replaced only if it is writable; a read-only
//! file stops the write with [`ValidateError::ReadOnlyFile`].

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::collect::{extract_id, extract_types};
use crate::error::ValidateError;
use crate::language::LanguageTracker;
use crate::structure::graph_of;
use crate::validate::Validator;
use crate::vocab::{METADATA_DESCRIPTOR_ID, PREVIEW_FILE_NAME, ROOT_ENTITY_ID};

/// Paths of the files written for a crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenCrate {
    pub metadata: PathBuf,
    pub preview: PathBuf,
}

fn ensure_project_dir(dir: &Path) -> Result<(), ValidateError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(ValidateError::MissingProjectDirectory(dir.to_path_buf()))
    }
}

/// Remove a file unless it is read-only; absent files are fine
fn remove_writable(path: &Path) -> Result<(), ValidateError> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    if metadata.permissions().readonly() {
        tracing::warn!(path = %path.display(), "refusing to replace read-only file");
        return Err(ValidateError::ReadOnlyFile(path.to_path_buf()));
    }
    fs::remove_file(path)?;
    Ok(())
}

/// Write the metadata document and its HTML preview into `dir`
pub fn write_crate(dir: &Path, document: &Value) -> Result<WrittenCrate, ValidateError> {
    ensure_project_dir(dir)?;
    let written = WrittenCrate {
        metadata: dir.join(METADATA_DESCRIPTOR_ID),
        preview: dir.join(PREVIEW_FILE_NAME),
    };

    // Check both before touching either
    for path in [&written.metadata, &written.preview] {
        if let Ok(metadata) = fs::metadata(path) {
            if metadata.permissions().readonly() {
                return Err(ValidateError::ReadOnlyFile(path.clone()));
            }
        }
    }

    remove_writable(&written.metadata)?;
    fs::write(&written.metadata, serde_json::to_string_pretty(document)?)?;
    remove_writable(&written.preview)?;
    fs::write(&written.preview, render_preview(document))?;

    tracing::info!(dir = %dir.display(), "wrote RO-Crate metadata and preview");
    Ok(written)
}

/// Delete the crate files from `dir`, refusing read-only ones
pub fn remove_crate_files(dir: &Path) -> Result<(), ValidateError> {
    ensure_project_dir(dir)?;
    remove_writable(&dir.join(METADATA_DESCRIPTOR_ID))?;
    remove_writable(&dir.join(PREVIEW_FILE_NAME))?;
    Ok(())
}

/// Validate, then write; an invalid document is not written
pub fn export_crate(
    dir: &Path,
    document: &Value,
    validator: &Validator,
    tracker: &LanguageTracker,
) -> Result<WrittenCrate, ValidateError> {
    ensure_project_dir(dir)?;
    validator
        .validate_with_tracker(document, tracker)
        .into_result(validator.options().summary_limit)?;
    write_crate(dir, document)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn display_name(entity: &Value) -> String {
    match entity.get("name") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("; "),
        _ => String::new(),
    }
}

/// Render a static HTML overview of the crate's entities
pub fn render_preview(document: &Value) -> String {
    let graph = graph_of(document).unwrap_or(&[]);
    let title = graph
        .iter()
        .find(|e| extract_id(e) == Some(ROOT_ENTITY_ID))
        .map(display_name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "RO-Crate".to_string());

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&title)));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(&title)));
    html.push_str("<table>\n<tr><th>@id</th><th>@type</th><th>name</th></tr>\n");
    for entity in graph {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(extract_id(entity).unwrap_or("")),
            escape_html(&extract_types(entity).join(", ")),
            escape_html(&display_name(entity)),
        ));
    }
    html.push_str("</table>\n</body>\n</html>\n");
    html
}
