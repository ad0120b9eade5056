//! Order-preserving key replacement on YAML mappings

use serde_yaml::{Mapping, Value};

/// Replace the entry `old_key` by `new_key: value` at the same position
///
/// Appends the new entry when `old_key` is absent.
pub fn replace_entry(mapping: &mut Mapping, old_key: &str, new_key: &str, value: Value) {
    if !mapping.contains_key(old_key) {
        mapping.insert(Value::String(new_key.to_string()), value);
        return;
    }

    let mut value = Some(value);
    *mapping = std::mem::take(mapping)
        .into_iter()
        .filter_map(|(k, v)| {
            if k.as_str() == Some(old_key) {
                value
                    .take()
                    .map(|replacement| (Value::String(new_key.to_string()), replacement))
            } else {
                Some((k, v))
            }
        })
        .collect();
}
