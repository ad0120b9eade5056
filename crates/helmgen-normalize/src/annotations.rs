//! Vendor annotation stripping

use serde_yaml::Value;

use helmgen_core::Document;

/// Remove every `metadata.annotations` entry whose key starts with `prefix`
///
/// An annotations mapping left empty is removed altogether. Returns the
/// number of removed annotations.
pub fn strip_vendor_annotations(document: &mut Document, prefix: &str) -> usize {
    let Some(metadata) = document.metadata_mut() else {
        return 0;
    };

    let (removed, now_empty) = match metadata.get_mut("annotations") {
        Some(Value::Mapping(annotations)) => {
            let before = annotations.len();
            annotations.retain(|key, _| !key.as_str().is_some_and(|k| k.starts_with(prefix)));
            (before - annotations.len(), annotations.is_empty())
        }
        _ => return 0,
    };

    if now_empty {
        metadata.shift_remove("annotations");
    }
    removed
}
