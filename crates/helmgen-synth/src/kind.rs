//! Template classification
//!
//! A template file is mapped to the resource kind it renders by its file
//! name: an exact lookup first, then an ordered list of substring checks for
//! the less regular names an external generator may produce.

use phf::phf_map;
use std::fmt;

/// Resource kinds the chart knows how to parameterize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Deployment,
    ConfigMap,
    Secret,
    Service,
    ServiceAccount,
    WorkerServiceAccount,
    Role,
    RoleBinding,
    ServiceMonitor,
}

static EXACT_NAMES: phf::Map<&'static str, TemplateKind> = phf_map! {
    "deployment.yaml" => TemplateKind::Deployment,
    "configmap.yaml" => TemplateKind::ConfigMap,
    "secret.yaml" => TemplateKind::Secret,
    "role.yaml" => TemplateKind::Role,
    "rolebinding.yaml" => TemplateKind::RoleBinding,
    "worker-serviceaccount.yaml" => TemplateKind::WorkerServiceAccount,
    "serviceaccount.yaml" => TemplateKind::ServiceAccount,
    "servicemonitor.yaml" => TemplateKind::ServiceMonitor,
    "service.yaml" => TemplateKind::Service,
};

/// Substring fallback, first match wins
///
/// Each entry lists the fragments that must all occur in the lower-cased
/// file name. `role`+`binding` precedes `role`, `worker`+`serviceaccount`
/// precedes `serviceaccount`, `servicemonitor` precedes `service`.
const FALLBACK: &[(&[&str], TemplateKind)] = &[
    (&["deployment"], TemplateKind::Deployment),
    (&["configmap"], TemplateKind::ConfigMap),
    (&["secret"], TemplateKind::Secret),
    (&["role", "binding"], TemplateKind::RoleBinding),
    (&["role"], TemplateKind::Role),
    (&["worker", "serviceaccount"], TemplateKind::WorkerServiceAccount),
    (&["serviceaccount"], TemplateKind::ServiceAccount),
    (&["servicemonitor"], TemplateKind::ServiceMonitor),
    (&["service"], TemplateKind::Service),
];

impl TemplateKind {
    /// Every kind, in the order built-in templates are emitted
    pub const ALL: [TemplateKind; 9] = [
        TemplateKind::Deployment,
        TemplateKind::ConfigMap,
        TemplateKind::Secret,
        TemplateKind::Service,
        TemplateKind::ServiceAccount,
        TemplateKind::WorkerServiceAccount,
        TemplateKind::Role,
        TemplateKind::RoleBinding,
        TemplateKind::ServiceMonitor,
    ];

    /// Classify a template by file name
    pub fn classify(file_name: &str) -> Option<Self> {
        if let Some(kind) = EXACT_NAMES.get(file_name) {
            return Some(*kind);
        }

        let lower = file_name.to_lowercase();
        FALLBACK
            .iter()
            .find(|(fragments, _)| fragments.iter().all(|f| lower.contains(f)))
            .map(|(_, kind)| *kind)
    }

    /// Canonical template file name
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Deployment => "deployment.yaml",
            Self::ConfigMap => "configmap.yaml",
            Self::Secret => "secret.yaml",
            Self::Service => "service.yaml",
            Self::ServiceAccount => "serviceaccount.yaml",
            Self::WorkerServiceAccount => "worker-serviceaccount.yaml",
            Self::Role => "role.yaml",
            Self::RoleBinding => "rolebinding.yaml",
            Self::ServiceMonitor => "servicemonitor.yaml",
        }
    }

    /// Opening guard for kinds that are optional in the chart
    pub fn guard(self) -> Option<&'static str> {
        match self {
            Self::Secret => {
                Some("{{- if and .Values.agent.token (not .Values.agent.existingSecretName) }}")
            }
            Self::Role | Self::RoleBinding => Some("{{- if .Values.rbac.create }}"),
            Self::WorkerServiceAccount => Some("{{- if .Values.workerServiceAccount.create }}"),
            Self::ServiceAccount => Some("{{- if .Values.serviceAccount.create }}"),
            Self::ServiceMonitor => Some("{{- if .Values.serviceMonitor.enabled }}"),
            Self::Deployment | Self::ConfigMap | Self::Service => None,
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Deployment => "Deployment",
            Self::ConfigMap => "ConfigMap",
            Self::Secret => "Secret",
            Self::Service => "Service",
            Self::ServiceAccount => "ServiceAccount",
            Self::WorkerServiceAccount => "worker ServiceAccount",
            Self::Role => "Role",
            Self::RoleBinding => "RoleBinding",
            Self::ServiceMonitor => "ServiceMonitor",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_names_round_trip() {
        for kind in TemplateKind::ALL {
            assert_eq!(TemplateKind::classify(kind.file_name()), Some(kind));
        }
    }

    #[test]
    fn test_fallback_order() {
        let cases = [
            ("agent-deployment.yaml", TemplateKind::Deployment),
            ("agent-config-configmap.yaml", TemplateKind::ConfigMap),
            ("agent-secret.yaml", TemplateKind::Secret),
            ("workflow-agent-rolebinding.yaml", TemplateKind::RoleBinding),
            ("role-binding-extra.yaml", TemplateKind::RoleBinding),
            ("workflow-agent-role.yaml", TemplateKind::Role),
            ("worker-service-account-serviceaccount.yaml", TemplateKind::WorkerServiceAccount),
            ("workflow-agent-serviceaccount.yaml", TemplateKind::ServiceAccount),
            ("agent-servicemonitor.yaml", TemplateKind::ServiceMonitor),
            ("metrics-service.yaml", TemplateKind::Service),
            ("Agent-Deployment.yaml", TemplateKind::Deployment),
        ];

        for (name, expected) in cases {
            assert_eq!(TemplateKind::classify(name), Some(expected), "{}", name);
        }
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(TemplateKind::classify("pdb.yaml"), None);
        assert_eq!(TemplateKind::classify("hpa.yaml"), None);
    }

    #[test]
    fn test_guards() {
        assert_eq!(TemplateKind::Service.guard(), None);
        assert_eq!(TemplateKind::Deployment.guard(), None);
        assert_eq!(
            TemplateKind::Role.guard(),
            TemplateKind::RoleBinding.guard()
        );
        assert_eq!(
            TemplateKind::WorkerServiceAccount.guard(),
            Some("{{- if .Values.workerServiceAccount.create }}")
        );
    }
}
