//! helm-gen Synth - builds a parameterized Helm chart
//!
//! Given the per-kind templates of an external generator (or nothing), the
//! [`Synthesizer`] writes a complete chart:
//!
//! - `Chart.yaml`, `values.yaml`, `.helmignore`, `templates/_helpers.tpl`
//!   and `templates/NOTES.txt` from fixed text
//! - one template per resource kind, with concrete values replaced by
//!   `.Values` references and optional resources wrapped in guards
//!
//! | Kind                   | Treatment                                              |
//! |------------------------|--------------------------------------------------------|
//! | Deployment             | `replicas`, `image`, `imagePullPolicy`, `serviceAccountName` |
//! | ConfigMap              | agent service URL, image, pull policy, worker pod spec |
//! | Secret                 | `agent.token` set and no `agent.existingSecretName`    |
//! | Role, RoleBinding      | `rbac.create`                                          |
//! | ServiceAccount         | `serviceAccount.create`                                |
//! | worker ServiceAccount  | `workerServiceAccount.create`                          |
//! | ServiceMonitor         | `serviceMonitor.enabled`                               |
//! | Service                | unchanged                                              |
//!
//! # Example
//!
//! ```no_run
//! use helmgen_core::ChartOptions;
//! use helmgen_synth::{SynthesisOptions, Synthesizer};
//!
//! let options = SynthesisOptions::new("./chart", ChartOptions::default());
//! let report = Synthesizer::new(options).run(None).unwrap();
//! println!("{} templates from {}", report.templates.len(), report.source);
//! ```

pub mod defaults;
pub mod guard;
pub mod kind;
pub mod scaffold;
pub mod substitute;
pub mod synthesizer;

pub use kind::TemplateKind;
pub use synthesizer::{
    EmittedTemplate, SynthesisOptions, SynthesisReport, Synthesizer, TemplateSource, Treatment,
    process_template,
};
