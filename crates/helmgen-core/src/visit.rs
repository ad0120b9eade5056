//! Recursive traversal of YAML value trees
//!
//! Cross-references between Kubernetes resources live in arbitrary fields
//! (`roleRef.name`, `subjects[].name`, env var values, ...). Instead of
//! special-casing known reference fields, rewriting is expressed as a visitor
//! over every string scalar in value position.

use serde_yaml::Value;

/// Callback interface for [`walk_mut`]
pub trait ValueVisitor {
    /// Called once for every string scalar that is not a mapping key
    fn visit_string(&mut self, value: &mut String);
}

impl<F> ValueVisitor for F
where
    F: FnMut(&mut String),
{
    fn visit_string(&mut self, value: &mut String) {
        self(value)
    }
}

/// Walk `value` depth-first, handing every string scalar to `visitor`
///
/// Mapping keys are left untouched; tagged values are unwrapped.
pub fn walk_mut<V: ValueVisitor + ?Sized>(visitor: &mut V, value: &mut Value) {
    match value {
        Value::String(s) => visitor.visit_string(s),
        Value::Sequence(items) => {
            for item in items {
                walk_mut(visitor, item);
            }
        }
        Value::Mapping(map) => {
            for (_, child) in map.iter_mut() {
                walk_mut(visitor, child);
            }
        }
        Value::Tagged(tagged) => walk_mut(visitor, &mut tagged.value),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visits_nested_strings() {
        let mut value: Value = serde_yaml::from_str(
            r#"
a: one
b:
  - two
  - c: three
    d: 4
e: true
"#,
        )
        .unwrap();

        let mut seen = Vec::new();
        walk_mut(&mut |s: &mut String| seen.push(s.clone()), &mut value);

        assert_eq!(seen, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_keys_are_not_visited() {
        let mut value: Value = serde_yaml::from_str("old: old\n").unwrap();

        walk_mut(
            &mut |s: &mut String| {
                if s == "old" {
                    *s = "new".to_string();
                }
            },
            &mut value,
        );

        assert_eq!(value.get("old").and_then(Value::as_str), Some("new"));
    }

    #[test]
    fn test_tagged_values_are_unwrapped() {
        let mut value: Value = serde_yaml::from_str("x: !custom inner\n").unwrap();

        let mut count = 0;
        walk_mut(&mut |_: &mut String| count += 1, &mut value);

        assert_eq!(count, 1);
    }
}
