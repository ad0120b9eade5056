//! Normalization pipeline
//!
//! Order matters: renames are computed from the untouched documents (they
//! need the autoname annotation), then every document is rewritten, stripped
//! of vendor annotations and, for Secrets, decoded.

use std::path::Path;

use helmgen_core::{CoreError, DocumentSet, NormalizeOptions, ResourceDescriptor, Result};

use crate::annotations::strip_vendor_annotations;
use crate::collision::disambiguate_service_accounts;
use crate::loader;
use crate::rename::RenameMap;
use crate::secret::normalize_secret;
use crate::warning::NormalizeWarning;

/// Result of a normalization run
#[derive(Debug, Clone)]
pub struct NormalizedOutput {
    /// Normalized documents, in input order
    pub documents: DocumentSet,
    /// Post-normalization apiVersion/kind/name of each document
    pub resources: Vec<ResourceDescriptor>,
    /// Multi-document YAML stream of `documents`
    pub yaml: String,
    /// Renames that were applied
    pub renames: RenameMap,
    pub warnings: Vec<NormalizeWarning>,
}

impl NormalizedOutput {
    /// Write the YAML stream to `path`, creating parent directories
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::write(parent, e))?;
        }
        std::fs::write(path, &self.yaml).map_err(|e| CoreError::write(path, e))
    }
}

/// Manifest normalizer
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Load and normalize every manifest in `input_dir`
    ///
    /// # Errors
    ///
    /// Fails when the directory cannot be read, a file is not valid YAML, or
    /// no resource is found at all.
    pub fn run(&self, input_dir: &Path) -> Result<NormalizedOutput> {
        let documents = loader::load_dir(input_dir)?;
        if documents.is_empty() {
            return Err(CoreError::EmptyInput {
                dir: input_dir.to_path_buf(),
            });
        }

        tracing::info!(
            "loaded {} resource(s) from {}",
            documents.len(),
            input_dir.display()
        );
        self.normalize(documents)
    }

    /// Normalize already-loaded documents
    pub fn normalize(&self, mut documents: DocumentSet) -> Result<NormalizedOutput> {
        let mut renames = RenameMap::build(&documents, &self.options);
        let mut warnings = disambiguate_service_accounts(&documents, &mut renames, &self.options);

        for doc in documents.iter_mut() {
            renames.apply(doc);
            strip_vendor_annotations(doc, &self.options.vendor_annotation_prefix);

            let undecodable = normalize_secret(doc);
            if !undecodable.is_empty() {
                let secret = doc.name().unwrap_or_default().to_string();
                warnings.extend(undecodable.into_iter().map(|key| {
                    NormalizeWarning::UndecodableSecretValue {
                        secret: secret.clone(),
                        key,
                    }
                }));
            }
        }

        for warning in &warnings {
            tracing::debug!("{}", warning);
        }

        let yaml = documents.to_yaml_stream()?;
        let resources = documents.descriptors();

        Ok(NormalizedOutput {
            documents,
            resources,
            yaml,
            renames,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helmgen_core::{Document, ErrorClass};
    use std::fs;
    use tempfile::TempDir;

    const AGENT_MANIFEST: &str = r#"apiVersion: v1
kind: ServiceAccount
metadata:
  name: workflow-agent-aaaa1111
  annotations:
    pulumi.com/autonamed: "true"
  labels:
    app.kubernetes.io/name: customer-managed-workflow-agent
---
apiVersion: v1
kind: ServiceAccount
metadata:
  name: workflow-agent-bbbb2222
  annotations:
    pulumi.com/autonamed: "true"
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: agent-config
  labels:
    app.kubernetes.io/name: customer-managed-workflow-agent
data:
  PULUMI_AGENT_SERVICE_URL: "https://api.pulumi.com"
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: workflow-agent-pool
  labels:
    app.kubernetes.io/name: customer-managed-workflow-agent
spec:
  template:
    spec:
      serviceAccountName: workflow-agent-aaaa1111
      containers:
        - name: agent
          env:
            - name: PULUMI_AGENT_SERVICE_ACCOUNT_NAME
              value: workflow-agent-bbbb2222
"#;

    fn write_manifest(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_run_normalizes_agent_stack() {
        let dir = TempDir::new().unwrap();
        write_manifest(&dir, "manifest.yaml", AGENT_MANIFEST);

        let output = Normalizer::default().run(dir.path()).unwrap();

        assert_eq!(output.resources.len(), 4);
        assert_eq!(output.resources[0].name, "workflow-agent");
        assert_eq!(output.resources[1].name, "worker-service-account");
        assert_eq!(output.resources[3].name, "workflow-agent-pool");
        assert!(output.warnings.is_empty());

        assert!(!output.yaml.contains("pulumi.com/"));
        assert!(!output.yaml.contains("aaaa1111"));
        assert!(output.yaml.contains("serviceAccountName: workflow-agent\n"));
        assert!(output.yaml.contains("value: worker-service-account\n"));
    }

    #[test]
    fn test_run_spans_files_in_lexical_order() {
        let dir = TempDir::new().unwrap();
        write_manifest(
            &dir,
            "20-binding.yaml",
            r#"apiVersion: rbac.authorization.k8s.io/v1
kind: RoleBinding
metadata:
  name: binding
subjects:
  - kind: ServiceAccount
    name: agent-0123abcd
"#,
        );
        write_manifest(
            &dir,
            "10-sa.yml",
            r#"apiVersion: v1
kind: ServiceAccount
metadata:
  name: agent-0123abcd
  annotations:
    pulumi.com/autonamed: "true"
"#,
        );

        let output = Normalizer::default().run(dir.path()).unwrap();

        let kinds: Vec<_> = output.resources.iter().map(|r| r.kind.as_str()).collect();
        assert_eq!(kinds, vec!["ServiceAccount", "RoleBinding"]);
        assert!(output.yaml.contains("name: agent\n"));
        assert!(!output.yaml.contains("agent-0123abcd"));
    }

    #[test]
    fn test_run_empty_dir() {
        let dir = TempDir::new().unwrap();
        write_manifest(&dir, "notes.txt", "not yaml");
        write_manifest(&dir, "empty.yaml", "# nothing here\n");

        let err = Normalizer::default().run(dir.path()).unwrap_err();
        assert_eq!(err.class(), ErrorClass::EmptyInput);
        assert!(err.to_string().contains("no Kubernetes resources"));
    }

    #[test]
    fn test_run_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        write_manifest(&dir, "broken.yaml", "apiVersion: v1\nkind: [\n");

        let err = Normalizer::default().run(dir.path()).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Parse);
    }

    #[test]
    fn test_secret_warning_names_secret_and_key() {
        let set: DocumentSet = [Document::from_yaml(
            "apiVersion: v1\nkind: Secret\nmetadata:\n  name: s\ndata:\n  token: '***'\n",
        )
        .unwrap()
        .unwrap()]
        .into_iter()
        .collect();

        let output = Normalizer::default().normalize(set).unwrap();
        assert_eq!(
            output.warnings,
            vec![NormalizeWarning::UndecodableSecretValue {
                secret: "s".to_string(),
                key: "token".to_string(),
            }]
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let dir = TempDir::new().unwrap();
        write_manifest(&dir, "manifest.yaml", AGENT_MANIFEST);

        let first = Normalizer::default().run(dir.path()).unwrap();

        let again = TempDir::new().unwrap();
        write_manifest(&again, "all.yaml", &first.yaml);
        let second = Normalizer::default().run(again.path()).unwrap();

        assert_eq!(first.yaml, second.yaml);
    }

    #[test]
    fn test_write_to_creates_parents() {
        let dir = TempDir::new().unwrap();
        write_manifest(&dir, "manifest.yaml", AGENT_MANIFEST);
        let output = Normalizer::default().run(dir.path()).unwrap();

        let target = dir.path().join("out").join("nested").join("all.yaml");
        output.write_to(&target).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), output.yaml);
    }

    #[test]
    fn test_output_snapshot() {
        let set: DocumentSet = [Document::from_yaml(
            r#"apiVersion: v1
kind: Secret
metadata:
  name: agent-secret-0123abcd
  annotations:
    pulumi.com/autonamed: "true"
data:
  PULUMI_AGENT_TOKEN: cGxhY2Vob2xkZXItdG9rZW4=
"#,
        )
        .unwrap()
        .unwrap()]
        .into_iter()
        .collect();

        let output = Normalizer::default().normalize(set).unwrap();
        insta::assert_snapshot!(output.yaml, @r"
        apiVersion: v1
        kind: Secret
        metadata:
          name: agent-secret
        stringData:
          PULUMI_AGENT_TOKEN: placeholder-token
        ");
    }
}
