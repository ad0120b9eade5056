//! Line-level value-to-parameter substitution
//!
//! Templates are treated as text, not YAML: an external generator may already
//! have inserted template directives that a YAML parser would reject. A line
//! is rewritten only when its mapping key is known and it does not already
//! hold a directive.

/// Replace the value of `key` with `replacement`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstitutionRule {
    /// Mapping key including the colon, e.g. `replicas:`
    pub key: &'static str,
    pub replacement: &'static str,
    /// Skip lines containing this text
    pub unless: Option<&'static str>,
}

impl SubstitutionRule {
    const fn new(key: &'static str, replacement: &'static str) -> Self {
        Self {
            key,
            replacement,
            unless: None,
        }
    }

    const fn unless(mut self, marker: &'static str) -> Self {
        self.unless = Some(marker);
        self
    }
}

pub const DEPLOYMENT_RULES: &[SubstitutionRule] = &[
    SubstitutionRule::new("replicas:", "{{ .Values.replicaCount }}"),
    SubstitutionRule::new("image:", r#"{{ include "chart.imageName" . | quote }}"#)
        .unless("PULUMI_AGENT_IMAGE"),
    SubstitutionRule::new("imagePullPolicy:", "{{ .Values.image.pullPolicy }}"),
    SubstitutionRule::new(
        "serviceAccountName:",
        r#"{{ include "chart.serviceAccountName" . }}"#,
    ),
];

pub const CONFIGMAP_RULES: &[SubstitutionRule] = &[
    SubstitutionRule::new(
        "PULUMI_AGENT_SERVICE_URL:",
        "{{ .Values.agent.serviceUrl | quote }}",
    ),
    SubstitutionRule::new(
        "PULUMI_AGENT_IMAGE:",
        r#"{{ include "chart.imageName" . | quote }}"#,
    ),
    SubstitutionRule::new(
        "PULUMI_AGENT_IMAGE_PULL_POLICY:",
        "{{ .Values.image.pullPolicy | quote }}",
    ),
    SubstitutionRule::new(
        "worker-pod.json:",
        "{{ .Values.podTemplate.workerPod | quote }}",
    ),
];

/// Apply `rules` to every line of `content`
///
/// The output has exactly as many lines as the input. Returns the rewritten
/// text and the number of substituted lines.
pub fn substitute(content: &str, rules: &[SubstitutionRule]) -> (String, usize) {
    let mut count = 0;
    let lines: Vec<String> = content
        .split('\n')
        .map(|line| match substitute_line(line, rules) {
            Some(rewritten) => {
                count += 1;
                rewritten
            }
            None => line.to_string(),
        })
        .collect();

    (lines.join("\n"), count)
}

/// Rewrite a single line, or `None` when no rule applies
pub fn substitute_line(line: &str, rules: &[SubstitutionRule]) -> Option<String> {
    if line.contains("{{") {
        return None;
    }

    let body_start = key_offset(line);
    let body = &line[body_start..];

    let rule = rules.iter().find(|rule| {
        body.starts_with(rule.key) && !rule.unless.is_some_and(|marker| line.contains(marker))
    })?;

    let prefix = &line[..body_start + rule.key.len()];
    Some(format!("{} {}", prefix, rule.replacement))
}

/// Byte offset of the mapping key: past indentation and one `- ` marker
fn key_offset(line: &str) -> usize {
    let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
    if line[indent..].starts_with("- ") {
        indent + 2
    } else {
        indent
    }
}
