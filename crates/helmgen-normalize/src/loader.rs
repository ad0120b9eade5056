//! Manifest discovery and parsing
//!
//! Only the top level of the input directory is read. Files are visited in
//! lexical order so that repeated runs over the same directory produce the
//! same stream.

use serde::Deserialize;
use serde_yaml::Value;
use std::ffi::OsStr;
use std::path::Path;
use walkdir::WalkDir;

use helmgen_core::{CoreError, Document, DocumentSet, Result};

/// Extensions recognized as manifests (case-sensitive)
const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Load every resource found in the `.yaml`/`.yml` files of `dir`
///
/// Documents that are not mappings or lack an `apiVersion` are treated as
/// noise and skipped.
pub fn load_dir(dir: &Path) -> Result<DocumentSet> {
    if !dir.exists() {
        return Err(CoreError::configuration_with_help(
            format!("input directory {} does not exist", dir.display()),
            "point --input-dir at the directory holding the rendered manifests",
        ));
    }
    if !dir.is_dir() {
        return Err(CoreError::configuration(format!(
            "input path {} is not a directory",
            dir.display()
        )));
    }

    let mut documents = DocumentSet::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            CoreError::configuration_io(
                format!("cannot list input directory {}", dir.display()),
                e.into(),
            )
        })?;
        let path = entry.path();

        if !path.is_file() || !is_manifest(path) {
            continue;
        }

        let bytes = std::fs::read(path).map_err(|e| CoreError::read(path, e))?;
        let content = String::from_utf8(bytes).map_err(|e| CoreError::MalformedResource {
            file: path.to_path_buf(),
            message: format!("not valid UTF-8 ({})", e.utf8_error()),
        })?;
        let parsed = parse_stream(path, &content)?;
        tracing::debug!("{}: {} resource(s)", path.display(), parsed.len());
        documents.extend(parsed);
    }

    Ok(documents)
}

fn is_manifest(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext))
}

/// Split a multi-document YAML stream into resources
///
/// `file` is only used for error reporting.
pub fn parse_stream(file: &Path, content: &str) -> Result<Vec<Document>> {
    let mut documents = Vec::new();

    for (index, de) in serde_yaml::Deserializer::from_str(content).enumerate() {
        let value = Value::deserialize(de).map_err(|source| CoreError::Parse {
            file: file.to_path_buf(),
            source,
        })?;

        let Some(document) = Document::from_value(value) else {
            tracing::debug!("{}: skipping non-mapping document #{}", file.display(), index);
            continue;
        };

        if document.api_version().is_none() {
            tracing::debug!("{}: skipping document #{} without apiVersion", file.display(), index);
            continue;
        }

        if document.kind().is_none() {
            return Err(CoreError::MalformedResource {
                file: file.to_path_buf(),
                message: format!("document #{} has an apiVersion but no kind", index),
            });
        }

        documents.push(document);
    }

    Ok(documents)
}
