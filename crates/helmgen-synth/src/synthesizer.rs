//! Chart synthesis
//!
//! Writes the scaffold, then either post-processes the per-kind templates of
//! an external generator or falls back to the built-in templates.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use helmgen_core::{ChartOptions, CoreError, Result};

use crate::defaults::default_template;
use crate::guard::wrap_with_guard;
use crate::kind::TemplateKind;
use crate::scaffold::scaffold;
use crate::substitute::{CONFIGMAP_RULES, DEPLOYMENT_RULES, substitute};

/// Template files of an external generator that the scaffold replaces
const SKIPPED_TEMPLATES: &[&str] = &["_helpers.tpl", "NOTES.txt"];

/// Options for the synthesizer
#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    /// Chart root; created if missing
    pub output_dir: PathBuf,
    pub chart: ChartOptions,
}

impl SynthesisOptions {
    pub fn new(output_dir: impl Into<PathBuf>, chart: ChartOptions) -> Self {
        Self {
            output_dir: output_dir.into(),
            chart,
        }
    }
}

/// Where the per-kind templates came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// The `templates` directory of an external generator's output
    External(PathBuf),
    BuiltIn,
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::External(dir) => write!(f, "{}", dir.display()),
            Self::BuiltIn => f.write_str("built-in templates"),
        }
    }
}

/// How a template was transformed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Treatment {
    /// Concrete values replaced by parameters on `lines` lines
    Substituted { lines: usize },
    /// Wrapped in a conditional guard
    Guarded,
    /// Written unchanged
    PassThrough,
    /// Built-in template
    Default,
}

impl fmt::Display for Treatment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Substituted { lines } => write!(f, "parameterized {} line(s)", lines),
            Self::Guarded => f.write_str("guarded"),
            Self::PassThrough => f.write_str("unchanged"),
            Self::Default => f.write_str("built-in"),
        }
    }
}

/// One written template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedTemplate {
    pub file_name: String,
    pub kind: Option<TemplateKind>,
    pub treatment: Treatment,
    pub path: PathBuf,
}

/// Result of a synthesis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisReport {
    pub source: TemplateSource,
    /// Scaffold files, in write order
    pub scaffold: Vec<PathBuf>,
    pub templates: Vec<EmittedTemplate>,
}

impl SynthesisReport {
    /// Every written file
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.scaffold
            .iter()
            .map(PathBuf::as_path)
            .chain(self.templates.iter().map(|t| t.path.as_path()))
    }
}

/// Transform one template according to its file name
pub fn process_template(
    file_name: &str,
    content: &str,
) -> (String, Option<TemplateKind>, Treatment) {
    let kind = TemplateKind::classify(file_name);

    let (output, treatment) = match kind {
        Some(TemplateKind::Deployment) => {
            let (out, lines) = substitute(content, DEPLOYMENT_RULES);
            (out, Treatment::Substituted { lines })
        }
        Some(TemplateKind::ConfigMap) => {
            let (out, lines) = substitute(content, CONFIGMAP_RULES);
            (out, Treatment::Substituted { lines })
        }
        Some(k) => match k.guard() {
            Some(guard) => (wrap_with_guard(content, guard), Treatment::Guarded),
            None => (content.to_string(), Treatment::PassThrough),
        },
        None => (content.to_string(), Treatment::PassThrough),
    };

    (output, kind, treatment)
}

/// Chart synthesizer
pub struct Synthesizer {
    options: SynthesisOptions,
}

impl Synthesizer {
    pub fn new(options: SynthesisOptions) -> Self {
        Self { options }
    }

    /// Write the chart
    ///
    /// `external` is the output directory of an external generator. When it
    /// is `None` or has no `templates` subdirectory, built-in templates are
    /// used instead.
    pub fn run(&self, external: Option<&Path>) -> Result<SynthesisReport> {
        let output_dir = &self.options.output_dir;
        let templates_dir = output_dir.join("templates");
        fs::create_dir_all(&templates_dir).map_err(|e| CoreError::write(&templates_dir, e))?;

        let mut written = Vec::new();
        for file in scaffold(&self.options.chart) {
            let path = output_dir.join(file.path);
            write_file(&path, &file.content)?;
            written.push(path);
        }

        let external_templates = external
            .map(|dir| dir.join("templates"))
            .filter(|dir| dir.is_dir());

        let (source, templates) = match external_templates {
            Some(dir) => {
                tracing::info!("post-processing templates from {}", dir.display());
                let templates = self.process_external(&dir, &templates_dir)?;
                (TemplateSource::External(dir), templates)
            }
            None => {
                tracing::info!("writing built-in templates");
                (TemplateSource::BuiltIn, self.write_defaults(&templates_dir)?)
            }
        };

        Ok(SynthesisReport {
            source,
            scaffold: written,
            templates,
        })
    }

    fn process_external(&self, source: &Path, target: &Path) -> Result<Vec<EmittedTemplate>> {
        let mut templates = Vec::new();

        for entry in WalkDir::new(source)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| CoreError::read(source, e.into()))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().into_owned();
            if SKIPPED_TEMPLATES.contains(&file_name.as_str()) {
                tracing::debug!("skipping {}", file_name);
                continue;
            }

            let content = fs::read_to_string(path).map_err(|e| CoreError::read(path, e))?;
            let (output, kind, treatment) = process_template(&file_name, &content);
            tracing::debug!("{}: {}", file_name, treatment);

            let out_path = target.join(&file_name);
            write_file(&out_path, &output)?;
            templates.push(EmittedTemplate {
                file_name,
                kind,
                treatment,
                path: out_path,
            });
        }

        Ok(templates)
    }

    fn write_defaults(&self, target: &Path) -> Result<Vec<EmittedTemplate>> {
        TemplateKind::ALL
            .iter()
            .map(|kind| {
                let path = target.join(kind.file_name());
                write_file(&path, default_template(*kind))?;
                Ok(EmittedTemplate {
                    file_name: kind.file_name().to_string(),
                    kind: Some(*kind),
                    treatment: Treatment::Default,
                    path,
                })
            })
            .collect()
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CoreError::write(parent, e))?;
    }
    fs::write(path, content).map_err(|e| CoreError::write(path, e))
}
