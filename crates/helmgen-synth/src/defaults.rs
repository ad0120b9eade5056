//! Built-in templates
//!
//! Used when no external generator output is available. They are already
//! parameterized and guarded, so they are written as-is.

use crate::kind::TemplateKind;

/// Built-in template text for `kind`
pub fn default_template(kind: TemplateKind) -> &'static str {
    match kind {
        TemplateKind::Deployment => DEPLOYMENT,
        TemplateKind::ConfigMap => CONFIGMAP,
        TemplateKind::Secret => SECRET,
        TemplateKind::Service => SERVICE,
        TemplateKind::ServiceAccount => SERVICE_ACCOUNT,
        TemplateKind::WorkerServiceAccount => WORKER_SERVICE_ACCOUNT,
        TemplateKind::Role => ROLE,
        TemplateKind::RoleBinding => ROLE_BINDING,
        TemplateKind::ServiceMonitor => SERVICE_MONITOR,
    }
}

const DEPLOYMENT: &str = r#"{{ include "chart.validateConfig" . }}
apiVersion: apps/v1
kind: Deployment
metadata:
  name: {{ include "chart.fullname" . }}-pool
  labels:
    {{- include "chart.labels" . | nindent 4 }}
  annotations:
    app.kubernetes.io/name: pulumi-workflow-agent-pool
    {{- with .Values.podAnnotations }}
    {{- toYaml . | nindent 4 }}
    {{- end }}
spec:
  replicas: {{ .Values.replicaCount }}
  strategy:
    type: {{ .Values.deploymentStrategy.type }}
    {{- if eq .Values.deploymentStrategy.type "RollingUpdate" }}
    rollingUpdate:
      maxSurge: {{ .Values.deploymentStrategy.rollingUpdate.maxSurge }}
      maxUnavailable: {{ .Values.deploymentStrategy.rollingUpdate.maxUnavailable }}
    {{- end }}
  selector:
    matchLabels:
      {{- include "chart.selectorLabels" . | nindent 6 }}
  template:
    metadata:
      labels:
        {{- include "chart.selectorLabels" . | nindent 8 }}
        {{- with .Values.podLabels }}
        {{- toYaml . | nindent 8 }}
        {{- end }}
      {{- with .Values.podAnnotations }}
      annotations:
        {{- toYaml . | nindent 8 }}
      {{- end }}
    spec:
      serviceAccountName: {{ include "chart.serviceAccountName" . }}
      terminationGracePeriodSeconds: {{ .Values.terminationGracePeriodSeconds }}
      {{- with .Values.imagePullSecrets }}
      imagePullSecrets:
        {{- toYaml . | nindent 8 }}
      {{- end }}
      {{- with .Values.podSecurityContext }}
      securityContext:
        {{- toYaml . | nindent 8 }}
      {{- end }}
      {{- with .Values.initContainers }}
      initContainers:
        {{- toYaml . | nindent 8 }}
      {{- end }}
      containers:
        - name: agent
          image: {{ include "chart.imageName" . | quote }}
          imagePullPolicy: {{ .Values.image.pullPolicy }}
          {{- with .Values.securityContext }}
          securityContext:
            {{- toYaml . | nindent 12 }}
          {{- end }}
          env:
            - name: PULUMI_AGENT_DEPLOY_TARGET
              value: {{ .Values.agent.deployTarget | quote }}
            - name: PULUMI_AGENT_SHARED_VOLUME_DIRECTORY
              value: {{ .Values.agent.sharedVolumeDirectory | quote }}
            - name: PULUMI_AGENT_SERVICE_URL
              valueFrom:
                configMapKeyRef:
                  name: {{ include "chart.configMapName" . }}
                  key: PULUMI_AGENT_SERVICE_URL
            - name: PULUMI_AGENT_IMAGE
              valueFrom:
                configMapKeyRef:
                  name: {{ include "chart.configMapName" . }}
                  key: PULUMI_AGENT_IMAGE
            - name: PULUMI_AGENT_IMAGE_PULL_POLICY
              valueFrom:
                configMapKeyRef:
                  name: {{ include "chart.configMapName" . }}
                  key: PULUMI_AGENT_IMAGE_PULL_POLICY
            {{- if or .Values.agent.token .Values.agent.existingSecretName }}
            - name: PULUMI_AGENT_TOKEN
              valueFrom:
                secretKeyRef:
                  name: {{ include "chart.secretName" . }}
                  key: PULUMI_AGENT_TOKEN
            {{- end }}
            - name: PULUMI_AGENT_SERVICE_ACCOUNT_NAME
              value: {{ include "chart.workerServiceAccountName" . | quote }}
            {{- if .Values.agent.numCpus }}
            - name: PULUMI_AGENT_NUM_CPUS
              value: {{ .Values.agent.numCpus | quote }}
            {{- end }}
            {{- if .Values.agent.memQuantity }}
            - name: PULUMI_AGENT_MEM_QUANTITY
              value: {{ .Values.agent.memQuantity | quote }}
            {{- end }}
            {{- with .Values.agent.extraEnvVars }}
            {{- toYaml . | nindent 12 }}
            {{- end }}
          ports:
            - name: http
              containerPort: 8080
              protocol: TCP
          {{- if .Values.livenessProbe.enabled }}
          livenessProbe:
            httpGet:
              path: /healthz
              port: http
            initialDelaySeconds: {{ .Values.livenessProbe.initialDelaySeconds }}
            periodSeconds: {{ .Values.livenessProbe.periodSeconds }}
          {{- end }}
          {{- if .Values.readinessProbe.enabled }}
          readinessProbe:
            httpGet:
              path: /healthz
              port: http
            initialDelaySeconds: {{ .Values.readinessProbe.initialDelaySeconds }}
            periodSeconds: {{ .Values.readinessProbe.periodSeconds }}
          {{- end }}
          volumeMounts:
            - name: agent-work
              mountPath: /mnt/work
            - name: agent-config
              mountPath: /mnt/worker-pod.json
              subPath: worker-pod.json
              readOnly: true
          {{- with .Values.resources }}
          resources:
            {{- toYaml . | nindent 12 }}
          {{- end }}
        {{- with .Values.sidecars }}
        {{- toYaml . | nindent 8 }}
        {{- end }}
      volumes:
        - name: agent-work
          emptyDir: {}
        - name: agent-config
          configMap:
            name: {{ include "chart.configMapName" . }}
      {{- with .Values.nodeSelector }}
      nodeSelector:
        {{- toYaml . | nindent 8 }}
      {{- end }}
      {{- with .Values.affinity }}
      affinity:
        {{- toYaml . | nindent 8 }}
      {{- end }}
      {{- with .Values.tolerations }}
      tolerations:
        {{- toYaml . | nindent 8 }}
      {{- end }}
"#;

const CONFIGMAP: &str = r#"apiVersion: v1
kind: ConfigMap
metadata:
  name: {{ include "chart.configMapName" . }}
  labels:
    {{- include "chart.labels" . | nindent 4 }}
data:
  PULUMI_AGENT_SERVICE_URL: {{ .Values.agent.serviceUrl | quote }}
  PULUMI_AGENT_IMAGE: {{ include "chart.imageName" . | quote }}
  PULUMI_AGENT_IMAGE_PULL_POLICY: {{ .Values.image.pullPolicy | quote }}
  worker-pod.json: {{ .Values.podTemplate.workerPod | quote }}
"#;

const SECRET: &str = r#"{{- if and .Values.agent.token (not .Values.agent.existingSecretName) }}
apiVersion: v1
kind: Secret
metadata:
  name: {{ include "chart.secretName" . }}
  labels:
    {{- include "chart.labels" . | nindent 4 }}
type: Opaque
stringData:
  PULUMI_AGENT_TOKEN: {{ .Values.agent.token | quote }}
{{- end }}
"#;

const SERVICE: &str = r#"apiVersion: v1
kind: Service
metadata:
  name: {{ include "chart.fullname" . }}-service
  labels:
    {{- include "chart.labels" . | nindent 4 }}
    app.kubernetes.io/component: metrics
  annotations:
    prometheus.io/scrape: {{ .Values.service.prometheus.scrape | quote }}
    prometheus.io/port: {{ .Values.service.port | quote }}
    prometheus.io/path: {{ .Values.service.prometheus.path | quote }}
spec:
  type: {{ .Values.service.type }}
  selector:
    {{- include "chart.selectorLabels" . | nindent 4 }}
  ports:
    - name: http
      port: {{ .Values.service.port }}
      targetPort: 8080
      protocol: TCP
"#;

const SERVICE_ACCOUNT: &str = r#"{{- if .Values.serviceAccount.create }}
apiVersion: v1
kind: ServiceAccount
metadata:
  name: {{ include "chart.serviceAccountName" . }}
  labels:
    {{- include "chart.labels" . | nindent 4 }}
  {{- with .Values.serviceAccount.annotations }}
  annotations:
    {{- toYaml . | nindent 4 }}
  {{- end }}
{{- end }}
"#;

const WORKER_SERVICE_ACCOUNT: &str = r#"{{- if .Values.workerServiceAccount.create }}
apiVersion: v1
kind: ServiceAccount
metadata:
  name: {{ include "chart.workerServiceAccountName" . }}
  labels:
    {{- include "chart.labels" . | nindent 4 }}
  {{- with .Values.workerServiceAccount.annotations }}
  annotations:
    {{- toYaml . | nindent 4 }}
  {{- end }}
{{- end }}
"#;

const ROLE: &str = r#"{{- if .Values.rbac.create }}
apiVersion: rbac.authorization.k8s.io/v1
kind: Role
metadata:
  name: {{ include "chart.fullname" . }}
  labels:
    {{- include "chart.labels" . | nindent 4 }}
rules:
  - apiGroups:
      - ""
    resources:
      - pods
      - pods/log
      - configmaps
    verbs:
      - create
      - get
      - list
      - watch
      - update
      - delete
{{- end }}
"#;

const ROLE_BINDING: &str = r#"{{- if .Values.rbac.create }}
apiVersion: rbac.authorization.k8s.io/v1
kind: RoleBinding
metadata:
  name: {{ include "chart.fullname" . }}
  labels:
    {{- include "chart.labels" . | nindent 4 }}
subjects:
  - kind: ServiceAccount
    name: {{ include "chart.serviceAccountName" . }}
    namespace: {{ .Release.Namespace }}
roleRef:
  kind: Role
  name: {{ include "chart.fullname" . }}
  apiGroup: rbac.authorization.k8s.io
{{- end }}
"#;

const SERVICE_MONITOR: &str = r#"{{- if .Values.serviceMonitor.enabled }}
apiVersion: monitoring.coreos.com/v1
kind: ServiceMonitor
metadata:
  name: {{ include "chart.fullname" . }}-monitor
  labels:
    {{- include "chart.labels" . | nindent 4 }}
spec:
  selector:
    matchLabels:
      {{- include "chart.selectorLabels" . | nindent 6 }}
      app.kubernetes.io/component: metrics
  endpoints:
    - port: http
      path: {{ .Values.serviceMonitor.path }}
      interval: {{ .Values.serviceMonitor.interval }}
{{- end }}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::GUARD_END;

    #[test]
    fn test_optional_kinds_are_guarded() {
        for kind in TemplateKind::ALL {
            let text = default_template(kind);
            match kind.guard() {
                Some(guard) => {
                    assert!(text.starts_with(guard), "{}", kind);
                    assert!(text.ends_with(&format!("{}\n", GUARD_END)), "{}", kind);
                }
                None => assert!(!text.starts_with("{{- if"), "{}", kind),
            }
        }
    }

    #[test]
    fn test_deployment_validates_config() {
        assert!(default_template(TemplateKind::Deployment)
            .starts_with("{{ include \"chart.validateConfig\" . }}\n"));
    }

    #[test]
    fn test_configmap_snapshot() {
        insta::assert_snapshot!(default_template(TemplateKind::ConfigMap), @r#"
        apiVersion: v1
        kind: ConfigMap
        metadata:
          name: {{ include "chart.configMapName" . }}
          labels:
            {{- include "chart.labels" . | nindent 4 }}
        data:
          PULUMI_AGENT_SERVICE_URL: {{ .Values.agent.serviceUrl | quote }}
          PULUMI_AGENT_IMAGE: {{ include "chart.imageName" . | quote }}
          PULUMI_AGENT_IMAGE_PULL_POLICY: {{ .Values.image.pullPolicy | quote }}
          worker-pod.json: {{ .Values.podTemplate.workerPod | quote }}
        "#);
    }
}
