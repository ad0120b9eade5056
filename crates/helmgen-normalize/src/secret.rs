//! Secret `data` to `stringData` rewriting
//!
//! Base64 values are unreadable in a chart template and cannot be
//! parameterized, so Secrets are rewritten to carry plain-text `stringData`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_yaml::{Mapping, Value};

use helmgen_core::Document;
use helmgen_core::mapping::replace_entry;

const SECRET: &str = "Secret";

/// Move a Secret's `data` entries into `stringData`, decoding them
///
/// Values that are not base64-encoded UTF-8 are copied unchanged; their keys
/// are returned. Entries already present in `stringData` win over decoded
/// ones. Non-Secret documents and Secrets without a `data` mapping are left
/// alone.
pub fn normalize_secret(document: &mut Document) -> Vec<String> {
    if !document.is_kind(SECRET) {
        return Vec::new();
    }

    let mut undecodable = Vec::new();
    let mut string_data = Mapping::new();

    match document.get("data") {
        Some(Value::Mapping(data)) => {
            for (key, value) in data {
                let converted = match value.as_str() {
                    Some(encoded) => match decode(encoded) {
                        Some(text) => Value::String(text),
                        None => {
                            undecodable.push(key_label(key));
                            value.clone()
                        }
                    },
                    None => value.clone(),
                };
                string_data.insert(key.clone(), converted);
            }
        }
        _ => return Vec::new(),
    }

    if let Some(Value::Mapping(existing)) = document.get("stringData") {
        for (key, value) in existing {
            string_data.insert(key.clone(), value.clone());
        }
    }

    let mapping = document.as_mapping_mut();
    mapping.shift_remove("stringData");
    replace_entry(mapping, "data", "stringData", Value::Mapping(string_data));

    undecodable
}

fn decode(encoded: &str) -> Option<String> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD.decode(compact.as_bytes()).ok()?;
    String::from_utf8(bytes).ok()
}

fn key_label(key: &Value) -> String {
    match key.as_str() {
        Some(s) => s.to_string(),
        None => serde_yaml::to_string(key)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
