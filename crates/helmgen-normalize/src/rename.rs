//! Generated-suffix detection and name propagation
//!
//! Pulumi appends an 8 hex digit suffix to auto-named resources
//! (`workflow-agent-e17e131b`). Those suffixes change between stacks, so they
//! are stripped and every reference to the suffixed name is rewritten.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use helmgen_core::{Document, DocumentSet, NormalizeOptions, ValueVisitor};

static GENERATED_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+)-[0-9a-f]{8}$").expect("generated suffix pattern is valid")
});

/// Return the base name if `name` ends in a generated suffix
pub fn strip_generated_suffix(name: &str) -> Option<&str> {
    GENERATED_SUFFIX
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|base| base.as_str())
}

/// Original name to normalized name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameMap {
    entries: BTreeMap<String, String>,
}

impl RenameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect renames for every auto-named resource with a generated suffix
    pub fn build(documents: &DocumentSet, options: &NormalizeOptions) -> Self {
        let mut map = Self::new();

        for doc in documents {
            let Some(name) = doc.name() else {
                continue;
            };
            if doc.annotation(&options.autoname_annotation) != Some("true") {
                continue;
            }
            if let Some(base) = strip_generated_suffix(name) {
                tracing::debug!("rename {} -> {}", name, base);
                map.insert(name, base);
            }
        }

        map
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.entries.insert(from.into(), to.into());
    }

    pub fn remove(&mut self, from: &str) -> Option<String> {
        self.entries.remove(from)
    }

    pub fn get(&self, from: &str) -> Option<&str> {
        self.entries.get(from).map(String::as_str)
    }

    pub fn contains(&self, from: &str) -> bool {
        self.entries.contains_key(from)
    }

    /// Normalized name of `name`, or `name` itself when it is not renamed
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name).unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Rewrite every string value of `document` that exactly equals a key
    ///
    /// Runs in a single pass: a replacement is never looked up again, so
    /// chained entries are not followed. Returns the number of rewrites.
    pub fn apply(&self, document: &mut Document) -> usize {
        if self.is_empty() {
            return 0;
        }
        let mut rewriter = Rewriter {
            map: self,
            count: 0,
        };
        document.walk_strings(&mut rewriter);
        rewriter.count
    }
}

struct Rewriter<'a> {
    map: &'a RenameMap,
    count: usize,
}

impl ValueVisitor for Rewriter<'_> {
    fn visit_string(&mut self, value: &mut String) {
        if let Some(to) = self.map.get(value) {
            *value = to.to_string();
            self.count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn doc(yaml: &str) -> Document {
        Document::from_yaml(yaml).unwrap().unwrap()
    }

    #[test]
    fn test_strip_generated_suffix() {
        assert_eq!(
            strip_generated_suffix("workflow-agent-e17e131b"),
            Some("workflow-agent")
        );
        assert_eq!(strip_generated_suffix("a-b-c-0123abcd"), Some("a-b-c"));
        // uppercase hex is not a generated suffix
        assert_eq!(strip_generated_suffix("agent-E17E131B"), None);
        assert_eq!(strip_generated_suffix("agent-e17e131"), None);
        assert_eq!(strip_generated_suffix("agent-e17e131bb"), None);
        assert_eq!(strip_generated_suffix("-e17e131b"), None);
        assert_eq!(strip_generated_suffix("agent-config"), None);
    }

    #[test]
    fn test_build_requires_autoname_annotation() {
        let set: DocumentSet = [
            doc(r#"
apiVersion: v1
kind: ServiceAccount
metadata:
  name: workflow-agent-e17e131b
  annotations:
    pulumi.com/autonamed: "true"
"#),
            doc(r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: agent-config
"#),
            doc(r#"
apiVersion: v1
kind: Service
metadata:
  name: unmarked-0123abcd
"#),
            doc(r#"
apiVersion: v1
kind: Role
metadata:
  name: role-0123abcd
  annotations:
    pulumi.com/autonamed: "false"
"#),
        ]
        .into_iter()
        .collect();

        let map = RenameMap::build(&set, &NormalizeOptions::default());

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("workflow-agent-e17e131b"), Some("workflow-agent"));
        assert!(!map.contains("agent-config"));
        assert!(!map.contains("unmarked-0123abcd"));
        assert!(!map.contains("role-0123abcd"));
    }

    #[test]
    fn test_apply_rewrites_references() {
        let mut binding = doc(r#"
apiVersion: rbac.authorization.k8s.io/v1
kind: RoleBinding
metadata:
  name: workflow-agent-cccc3333
subjects:
  - kind: ServiceAccount
    name: workflow-agent-aaaa1111
roleRef:
  kind: Role
  name: workflow-agent-dddd4444
"#);

        let mut map = RenameMap::new();
        map.insert("workflow-agent-cccc3333", "workflow-agent");
        map.insert("workflow-agent-aaaa1111", "workflow-agent");
        map.insert("workflow-agent-dddd4444", "workflow-agent");

        assert_eq!(map.apply(&mut binding), 3);
        assert_eq!(binding.name(), Some("workflow-agent"));

        let subject = &binding.get("subjects").unwrap()[0];
        assert_eq!(subject.get("name").and_then(Value::as_str), Some("workflow-agent"));
        let role_ref = binding.get("roleRef").unwrap();
        assert_eq!(role_ref.get("name").and_then(Value::as_str), Some("workflow-agent"));
    }

    #[test]
    fn test_apply_is_exact_match_and_skips_keys() {
        let mut cm = doc(r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: agent-config
data:
  workflow-agent-aaaa1111: workflow-agent-aaaa1111
  url: http://workflow-agent-aaaa1111:8080
"#);

        let mut map = RenameMap::new();
        map.insert("workflow-agent-aaaa1111", "workflow-agent");
        map.apply(&mut cm);

        let data = cm.get("data").unwrap();
        assert_eq!(
            data.get("workflow-agent-aaaa1111").and_then(Value::as_str),
            Some("workflow-agent")
        );
        assert_eq!(
            data.get("url").and_then(Value::as_str),
            Some("http://workflow-agent-aaaa1111:8080")
        );
    }

    #[test]
    fn test_apply_is_single_pass() {
        let mut cm = doc("apiVersion: v1\nkind: ConfigMap\ndata:\n  a: x\n");

        let mut map = RenameMap::new();
        map.insert("x", "y");
        map.insert("y", "z");
        map.apply(&mut cm);

        let data = cm.get("data").unwrap();
        assert_eq!(data.get("a").and_then(Value::as_str), Some("y"));
    }

    #[test]
    fn test_resolve() {
        let mut map = RenameMap::new();
        map.insert("a-0123abcd", "a");
        assert_eq!(map.resolve("a-0123abcd"), "a");
        assert_eq!(map.resolve("other"), "other");
    }
}
