//! Chart scaffolding
//!
//! The files every generated chart carries regardless of its templates.
//! Only `Chart.yaml` depends on the run options.

use helmgen_core::ChartOptions;

pub const CHART_YAML: &str = "Chart.yaml";
pub const VALUES_YAML: &str = "values.yaml";
pub const HELPERS_TPL: &str = "templates/_helpers.tpl";
pub const NOTES_TXT: &str = "templates/NOTES.txt";
pub const HELMIGNORE: &str = ".helmignore";

/// A file written at a fixed path relative to the chart root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldFile {
    pub path: &'static str,
    pub content: String,
}

/// Every scaffold file, in write order
pub fn scaffold(chart: &ChartOptions) -> Vec<ScaffoldFile> {
    vec![
        ScaffoldFile {
            path: CHART_YAML,
            content: chart_yaml(chart),
        },
        ScaffoldFile {
            path: VALUES_YAML,
            content: values_yaml().to_string(),
        },
        ScaffoldFile {
            path: HELPERS_TPL,
            content: helpers_tpl().to_string(),
        },
        ScaffoldFile {
            path: NOTES_TXT,
            content: notes_txt().to_string(),
        },
        ScaffoldFile {
            path: HELMIGNORE,
            content: helmignore().to_string(),
        },
    ]
}

pub fn chart_yaml(chart: &ChartOptions) -> String {
    format!(
        r#"apiVersion: v2
name: {name}
description: Helm chart for deploying the Pulumi Customer-Managed Workflow Agent
type: application
version: {version}
appVersion: {app_version}
maintainers:
  - name: Pulumi
    url: https://github.com/pulumi
home: https://github.com/pulumi/customer-managed-workflow-agent
sources:
  - https://github.com/pulumi/customer-managed-workflow-agent
"#,
        name = chart.name,
        version = chart.version,
        app_version = chart.app_version,
    )
}

pub fn values_yaml() -> &'static str {
    r#"replicaCount: 1

image:
  registry: ""  # e.g., "my-registry.example.com"
  repository: pulumi/customer-managed-workflow-agent
  pullPolicy: IfNotPresent
  tag: ""  # defaults to appVersion

imagePullSecrets: []

nameOverride: ""
fullnameOverride: ""

agent:
  serviceUrl: "https://api.pulumi.com"
  token: ""                          # required - Pulumi agent access token
  existingSecretName: ""             # use existing secret instead
  deployTarget: "kubernetes"
  sharedVolumeDirectory: "/mnt/work"
  numCpus: ""
  memQuantity: ""
  extraEnvVars: []

workerServiceAccount:
  create: true
  annotations: {}
  name: ""  # defaults to "{fullname}-worker"

serviceAccount:
  create: true
  annotations: {}
  name: ""

rbac:
  create: true

podTemplate:
  workerPod: "{}"

service:
  type: ClusterIP
  port: 8080
  prometheus:
    scrape: "true"
    path: /healthz

serviceMonitor:
  enabled: false
  interval: "30s"
  path: /healthz

livenessProbe:
  enabled: false
  initialDelaySeconds: 30
  periodSeconds: 10

readinessProbe:
  enabled: false
  initialDelaySeconds: 5
  periodSeconds: 10

podSecurityContext: {}
securityContext: {}
resources: {}
nodeSelector: {}
tolerations: []
affinity: {}
initContainers: []
sidecars: []
podAnnotations: {}
podLabels: {}
deploymentStrategy:
  type: RollingUpdate
  rollingUpdate:
    maxSurge: "25%"
    maxUnavailable: "25%"
terminationGracePeriodSeconds: 300
"#
}

pub fn helpers_tpl() -> &'static str {
    r#"{{/*
Expand the name of the chart.
*/}}
{{- define "chart.name" -}}
{{- default .Chart.Name .Values.nameOverride | trunc 63 | trimSuffix "-" }}
{{- end }}

{{/*
Create a default fully qualified app name.
*/}}
{{- define "chart.fullname" -}}
{{- if .Values.fullnameOverride }}
{{- .Values.fullnameOverride | trunc 63 | trimSuffix "-" }}
{{- else }}
{{- $name := default .Chart.Name .Values.nameOverride }}
{{- if contains $name .Release.Name }}
{{- .Release.Name | trunc 63 | trimSuffix "-" }}
{{- else }}
{{- printf "%s-%s" .Release.Name $name | trunc 63 | trimSuffix "-" }}
{{- end }}
{{- end }}
{{- end }}

{{/*
Create chart name and version as used by the chart label.
*/}}
{{- define "chart.chart" -}}
{{- printf "%s-%s" .Chart.Name .Chart.Version | replace "+" "_" | trunc 63 | trimSuffix "-" }}
{{- end }}

{{/*
Common labels
*/}}
{{- define "chart.labels" -}}
helm.sh/chart: {{ include "chart.chart" . }}
{{ include "chart.selectorLabels" . }}
{{- if .Chart.AppVersion }}
app.kubernetes.io/version: {{ .Chart.AppVersion | quote }}
{{- end }}
app.kubernetes.io/managed-by: {{ .Release.Service }}
{{- end }}

{{/*
Selector labels
*/}}
{{- define "chart.selectorLabels" -}}
app.kubernetes.io/name: customer-managed-workflow-agent
app.kubernetes.io/instance: {{ .Release.Name }}
{{- end }}

{{/*
Create the name of the service account to use
*/}}
{{- define "chart.serviceAccountName" -}}
{{- if .Values.serviceAccount.name }}
{{- .Values.serviceAccount.name }}
{{- else }}
{{- include "chart.fullname" . }}
{{- end }}
{{- end }}

{{/*
Create the worker service account name
*/}}
{{- define "chart.workerServiceAccountName" -}}
{{- if .Values.workerServiceAccount.name }}
{{- .Values.workerServiceAccount.name }}
{{- else }}
{{- printf "%s-worker" (include "chart.fullname" .) }}
{{- end }}
{{- end }}

{{/*
Create the full image name with tag
*/}}
{{- define "chart.imageName" -}}
{{- if .Values.image.registry -}}
{{- printf "%s/%s:%s" .Values.image.registry .Values.image.repository (.Values.image.tag | default .Chart.AppVersion) }}
{{- else -}}
{{- printf "%s:%s" .Values.image.repository (.Values.image.tag | default .Chart.AppVersion) }}
{{- end -}}
{{- end }}

{{/*
Create the name of the secret to use
*/}}
{{- define "chart.secretName" -}}
{{- if .Values.agent.existingSecretName }}
{{- .Values.agent.existingSecretName }}
{{- else }}
{{- printf "%s-secret" (include "chart.fullname" .) }}
{{- end }}
{{- end }}

{{/*
Create the name of the configmap
*/}}
{{- define "chart.configMapName" -}}
{{- printf "%s-config" (include "chart.fullname" .) }}
{{- end }}

{{/*
Validate required configuration
*/}}
{{- define "chart.validateConfig" -}}
{{- if and (not .Values.agent.token) (not .Values.agent.existingSecretName) -}}
{{- fail "Either agent.token or agent.existingSecretName must be set" -}}
{{- end -}}
{{- end -}}
"#
}

pub fn notes_txt() -> &'static str {
    r#"Thank you for installing {{ .Chart.Name }}.

Your release is named {{ .Release.Name }}.

To check the status of the deployment:

  kubectl get deployments -n {{ .Release.Namespace }} -l "app.kubernetes.io/instance={{ .Release.Name }}"

To check the agent pods:

  kubectl get pods -n {{ .Release.Namespace }} -l "app.kubernetes.io/instance={{ .Release.Name }}"

To view agent logs:

  kubectl logs -n {{ .Release.Namespace }} -l "app.kubernetes.io/name=customer-managed-workflow-agent" -f

{{- if not .Values.agent.token }}
{{- if not .Values.agent.existingSecretName }}

WARNING: No agent token is configured. Set agent.token or agent.existingSecretName in your values.
{{- end }}
{{- end }}

{{- if .Values.workerServiceAccount.create }}

A worker ServiceAccount ({{ include "chart.workerServiceAccountName" . }}) has been created for worker pods.
To use cloud IAM (e.g., AWS IRSA), add annotations via workerServiceAccount.annotations.
{{- end }}

For more information, visit:
  https://github.com/pulumi/customer-managed-workflow-agent
"#
}

pub fn helmignore() -> &'static str {
    ".DS_Store
.git/
.gitignore
.bzr/
.bzrignore
.hg/
.hgignore
.svn/
*.swp
*.bak
*.tmp
*.orig
*~
.project
.idea/
*.tmproj
.vscode/
"
}
