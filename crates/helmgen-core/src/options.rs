//! Run configuration
//!
//! Both stages are pure functions of these options; nothing is read from
//! global state.

use regex::Regex;
use semver::Version;
use std::sync::LazyLock;

use crate::annotations::{PRIMARY_WORKLOAD, WORKER_SERVICE_ACCOUNT, labels, pulumi};
use crate::error::{CoreError, Result};

/// Default chart name
pub const DEFAULT_CHART_NAME: &str = "pulumi-deployment-agent";

/// Default chart version
pub const DEFAULT_CHART_VERSION: &str = "0.1.0";

/// Lowercase letters, digits and inner dashes, as Helm recommends
static CHART_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("chart name pattern is valid")
});

/// Chart identity interpolated into Chart.yaml
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartOptions {
    pub name: String,
    pub version: String,
    pub app_version: String,
}

impl ChartOptions {
    /// Build chart options, defaulting `app_version` to `version`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the name is not a valid chart name or
    /// the version is not SemVer (Helm refuses to package such charts).
    pub fn new(name: &str, version: &str, app_version: Option<&str>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::configuration("chart name must not be empty"));
        }
        if !CHART_NAME.is_match(name) {
            return Err(CoreError::configuration_with_help(
                format!("invalid chart name '{}'", name),
                "chart names use lowercase letters, digits and dashes, e.g. my-agent",
            ));
        }

        Version::parse(version).map_err(|e| {
            CoreError::configuration_with_help(
                format!("invalid chart version '{}': {}", version, e),
                "chart versions must be SemVer 2, e.g. 0.1.0",
            )
        })?;

        let app_version = match app_version.map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => version.to_string(),
        };

        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            app_version,
        })
    }
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_CHART_NAME.to_string(),
            version: DEFAULT_CHART_VERSION.to_string(),
            app_version: DEFAULT_CHART_VERSION.to_string(),
        }
    }
}

/// A `key: value` label requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMatch {
    pub key: String,
    pub value: String,
}

impl LabelMatch {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Knobs for the manifest normalizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Annotation whose `"true"` value marks a generated name suffix
    pub autoname_annotation: String,
    /// Annotations under this prefix are stripped
    pub vendor_annotation_prefix: String,
    /// Label identifying the main workload's ServiceAccount
    pub primary_label: LabelMatch,
    /// Name given to the other ServiceAccount of a collision pair
    pub fallback_service_account: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            autoname_annotation: pulumi::AUTONAMED.to_string(),
            vendor_annotation_prefix: pulumi::PREFIX.to_string(),
            primary_label: LabelMatch::new(labels::NAME, PRIMARY_WORKLOAD),
            fallback_service_account: WORKER_SERVICE_ACCOUNT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_version_defaults_to_chart_version() {
        let opts = ChartOptions::new("agent", "1.2.3", None).unwrap();
        assert_eq!(opts.app_version, "1.2.3");

        let opts = ChartOptions::new("agent", "1.2.3", Some("")).unwrap();
        assert_eq!(opts.app_version, "1.2.3");
    }

    #[test]
    fn test_explicit_app_version() {
        let opts = ChartOptions::new("agent", "1.2.3", Some("2.1.0")).unwrap();
        assert_eq!(opts.version, "1.2.3");
        assert_eq!(opts.app_version, "2.1.0");
    }

    #[test]
    fn test_invalid_chart_version_rejected() {
        let err = ChartOptions::new("agent", "one", None).unwrap_err();
        assert!(err.to_string().contains("invalid chart version 'one'"));
    }

    #[test]
    fn test_empty_chart_name_rejected() {
        assert!(ChartOptions::new("  ", "0.1.0", None).is_err());
    }

    #[test]
    fn test_chart_name_must_be_helm_compatible() {
        for name in ["a: b", "../escape", "nested/chart", "Agent", "-agent", "agent-"] {
            let err = ChartOptions::new(name, "0.1.0", None).unwrap_err();
            assert_eq!(err.class(), crate::ErrorClass::Configuration, "{}", name);
        }

        let opts = ChartOptions::new(" pulumi-agent2 ", "0.1.0", None).unwrap();
        assert_eq!(opts.name, "pulumi-agent2");
    }

    #[test]
    fn test_default_normalize_options() {
        let opts = NormalizeOptions::default();
        assert_eq!(opts.autoname_annotation, "pulumi.com/autonamed");
        assert_eq!(opts.vendor_annotation_prefix, "pulumi.com/");
        assert_eq!(opts.primary_label.key, "app.kubernetes.io/name");
        assert_eq!(opts.primary_label.value, "customer-managed-workflow-agent");
        assert_eq!(opts.fallback_service_account, "worker-service-account");
    }
}
