//! Kubernetes resource documents
//!
//! A [`Document`] is kept as an ordered YAML mapping rather than a typed
//! Kubernetes object: the normalizer must reach every field of every kind,
//! including CRDs it has never heard of, and must write the document back
//! with its original key order.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::path::Path;

use crate::error::{CoreError, Result};
use crate::options::LabelMatch;
use crate::visit::{ValueVisitor, walk_mut};

/// Separator placed between documents of a YAML stream
pub const DOCUMENT_SEPARATOR: &str = "---\n";

/// One Kubernetes resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Mapping);

impl Document {
    pub fn from_mapping(mapping: Mapping) -> Self {
        Self(mapping)
    }

    /// Wrap a parsed YAML value; anything but a mapping is rejected
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Mapping(mapping) => Some(Self(mapping)),
            _ => None,
        }
    }

    /// Parse a single-document YAML string
    ///
    /// Syntax errors are reported as parse errors of `<inline>`.
    pub fn from_yaml(yaml: &str) -> Result<Option<Self>> {
        let value: Value = serde_yaml::from_str(yaml).map_err(|source| CoreError::Parse {
            file: Path::new("<inline>").to_path_buf(),
            source,
        })?;
        Ok(Self::from_value(value))
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }

    pub fn as_mapping_mut(&mut self) -> &mut Mapping {
        &mut self.0
    }

    pub fn into_mapping(self) -> Mapping {
        self.0
    }

    /// Top-level field lookup
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// `apiVersion`, if present and non-empty
    pub fn api_version(&self) -> Option<&str> {
        non_empty_str(self.0.get("apiVersion"))
    }

    /// `kind`, if present and non-empty
    pub fn kind(&self) -> Option<&str> {
        non_empty_str(self.0.get("kind"))
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind() == Some(kind)
    }

    /// `metadata.name`, if present and non-empty
    pub fn name(&self) -> Option<&str> {
        non_empty_str(self.metadata()?.get("name"))
    }

    pub fn metadata(&self) -> Option<&Mapping> {
        self.0.get("metadata").and_then(Value::as_mapping)
    }

    pub fn metadata_mut(&mut self) -> Option<&mut Mapping> {
        self.0.get_mut("metadata").and_then(Value::as_mapping_mut)
    }

    pub fn annotations(&self) -> Option<&Mapping> {
        self.metadata()?.get("annotations").and_then(Value::as_mapping)
    }

    pub fn labels(&self) -> Option<&Mapping> {
        self.metadata()?.get("labels").and_then(Value::as_mapping)
    }

    /// String value of an annotation
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations()?.get(key).and_then(Value::as_str)
    }

    /// String value of a label
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels()?.get(key).and_then(Value::as_str)
    }

    pub fn has_label(&self, label: &LabelMatch) -> bool {
        self.label(&label.key) == Some(label.value.as_str())
    }

    /// Summary used for progress reporting
    pub fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            api_version: self.api_version().unwrap_or_default().to_string(),
            kind: self.kind().unwrap_or_default().to_string(),
            name: self.name().unwrap_or_default().to_string(),
        }
    }

    /// Run `visitor` over every string value of the document
    pub fn walk_strings<V: ValueVisitor + ?Sized>(&mut self, visitor: &mut V) {
        for (_, value) in self.0.iter_mut() {
            walk_mut(visitor, value);
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.0)?)
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Ordered collection of documents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentSet {
    documents: Vec<Document>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    pub fn extend(&mut self, documents: impl IntoIterator<Item = Document>) {
        self.documents.extend(documents);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Document> {
        self.documents.iter_mut()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn descriptors(&self) -> Vec<ResourceDescriptor> {
        self.documents.iter().map(Document::descriptor).collect()
    }

    /// Serialize as a multi-document YAML stream, preserving order
    pub fn to_yaml_stream(&self) -> Result<String> {
        let parts = self
            .documents
            .iter()
            .map(Document::to_yaml)
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join(DOCUMENT_SEPARATOR))
    }
}

impl FromIterator<Document> for DocumentSet {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for DocumentSet {
    type Item = Document;
    type IntoIter = std::vec::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

impl<'a> IntoIterator for &'a DocumentSet {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

/// apiVersion/kind/name of a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub api_version: String,
    pub kind: String,
    pub name: String,
}

impl fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.api_version, self.kind, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    #[test]
    fn test_from_yaml_syntax_error_is_parse_class() {
        let err = Document::from_yaml("apiVersion: v1\nkind: [\n").unwrap_err();
        assert_eq!(err.class(), ErrorClass::Parse);
        assert!(err.to_string().contains("<inline>"));
    }

    fn service_account() -> Document {
        Document::from_yaml(
            r#"
apiVersion: v1
kind: ServiceAccount
metadata:
  name: workflow-agent-e17e131b
  annotations:
    pulumi.com/autonamed: "true"
  labels:
    app.kubernetes.io/name: customer-managed-workflow-agent
"#,
        )
        .unwrap()
        .unwrap()
    }

    #[test]
    fn test_accessors() {
        let doc = service_account();
        assert_eq!(doc.api_version(), Some("v1"));
        assert_eq!(doc.kind(), Some("ServiceAccount"));
        assert!(doc.is_kind("ServiceAccount"));
        assert_eq!(doc.name(), Some("workflow-agent-e17e131b"));
        assert_eq!(doc.annotation("pulumi.com/autonamed"), Some("true"));
        assert!(doc.has_label(&LabelMatch::new(
            "app.kubernetes.io/name",
            "customer-managed-workflow-agent"
        )));
    }

    #[test]
    fn test_non_mapping_is_not_a_document() {
        assert!(Document::from_yaml("- a\n- b\n").unwrap().is_none());
        assert!(Document::from_yaml("just a string").unwrap().is_none());
    }

    #[test]
    fn test_descriptor_display() {
        let doc = service_account();
        assert_eq!(
            doc.descriptor().to_string(),
            "v1/ServiceAccount (workflow-agent-e17e131b)"
        );
    }

    #[test]
    fn test_stream_preserves_order_and_separates() {
        let set: DocumentSet = [
            Document::from_yaml("apiVersion: v1\nkind: A\n").unwrap().unwrap(),
            Document::from_yaml("apiVersion: v1\nkind: B\n").unwrap().unwrap(),
        ]
        .into_iter()
        .collect();

        let stream = set.to_yaml_stream().unwrap();
        insta::assert_snapshot!(stream, @r"
        apiVersion: v1
        kind: A
        ---
        apiVersion: v1
        kind: B
        ");
    }

    #[test]
    fn test_key_order_is_preserved() {
        let doc = Document::from_yaml("kind: Z\napiVersion: v1\nmetadata:\n  name: x\n")
            .unwrap()
            .unwrap();
        let yaml = doc.to_yaml().unwrap();
        assert!(yaml.find("kind").unwrap() < yaml.find("apiVersion").unwrap());
    }
}
