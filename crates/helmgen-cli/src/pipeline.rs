//! End-to-end run: normalize, optionally run the external generator, then
//! synthesize the chart

use std::fs;
use std::path::{Path, PathBuf};

use helmgen_core::{ChartOptions, CoreError};
use helmgen_normalize::Normalizer;
use helmgen_synth::{SynthesisOptions, SynthesisReport, Synthesizer};

use crate::display::Printer;
use crate::error::{CliError, Result, Stage};
use crate::external::ExternalTransform;

/// Name of the normalized stream inside the work directory
const NORMALIZED_FILE: &str = "all.yaml";

/// Subdirectory of the work directory handed to the external generator
const EXTERNAL_OUTPUT_DIR: &str = "helmify-output";

/// Everything a run needs, already validated by clap
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub chart: ChartOptions,
    /// Overwrite a non-empty output directory
    pub force: bool,
    /// Also write the normalized stream here
    pub emit_normalized: Option<PathBuf>,
}

/// What a successful run produced
#[derive(Debug)]
pub struct PipelineSummary {
    pub resources: usize,
    pub warnings: usize,
    pub report: SynthesisReport,
}

pub fn run(
    config: &PipelineConfig,
    transform: Option<&dyn ExternalTransform>,
    printer: &Printer,
) -> Result<PipelineSummary> {
    check_directories(config).map_err(CliError::at(Stage::Options))?;

    printer.header(&config.input_dir);
    let normalized = Normalizer::default()
        .run(&config.input_dir)
        .map_err(CliError::at(Stage::Normalize))?;
    printer.resources(&normalized.resources);
    printer.warnings(&normalized.warnings);

    // removed on drop, including on error
    let work = tempfile::Builder::new()
        .prefix("helm-gen-")
        .tempdir()
        .map_err(|e| CoreError::write(&std::env::temp_dir(), e))
        .map_err(CliError::at(Stage::WriteNormalized))?;
    let stream = work.path().join(NORMALIZED_FILE);
    normalized
        .write_to(&stream)
        .map_err(CliError::at(Stage::WriteNormalized))?;

    if let Some(path) = &config.emit_normalized {
        normalized
            .write_to(path)
            .map_err(CliError::at(Stage::WriteNormalized))?;
        printer.step(format!("Wrote normalized manifests to {}", path.display()));
    }

    let external = transform.and_then(|transform| {
        let chart_dir = work
            .path()
            .join(EXTERNAL_OUTPUT_DIR)
            .join(&config.chart.name);
        run_external(transform, &stream, &chart_dir, printer)
    });

    let synthesizer = Synthesizer::new(SynthesisOptions::new(
        &config.output_dir,
        config.chart.clone(),
    ));
    let report = synthesizer
        .run(external.as_deref())
        .map_err(CliError::at(Stage::Generate))?;

    printer.report(&report, &config.output_dir);
    printer.success(&config.output_dir);

    Ok(PipelineSummary {
        resources: normalized.resources.len(),
        warnings: normalized.warnings.len(),
        report,
    })
}

/// Run the generator; `None` selects the built-in templates
fn run_external(
    transform: &dyn ExternalTransform,
    stream: &Path,
    chart_dir: &Path,
    printer: &Printer,
) -> Option<PathBuf> {
    match transform.transform(stream, chart_dir) {
        Ok(()) => {
            printer.step(format!("Post-processing {} output", transform.name()));
            Some(chart_dir.to_path_buf())
        }
        Err(err) => {
            tracing::warn!("{}; falling back to built-in templates", err);
            printer.step(format!(
                "Generating templates directly ({} not available)",
                transform.name()
            ));
            None
        }
    }
}

fn check_directories(config: &PipelineConfig) -> helmgen_core::Result<()> {
    let input = &config.input_dir;
    if !input.is_dir() {
        let message = if input.exists() {
            format!("input path {} is not a directory", input.display())
        } else {
            format!("input directory {} does not exist", input.display())
        };
        return Err(CoreError::configuration(message));
    }

    let output = &config.output_dir;
    if !output.exists() {
        return Ok(());
    }
    if !output.is_dir() {
        return Err(CoreError::configuration(format!(
            "output path {} is not a directory",
            output.display()
        )));
    }

    let mut entries = fs::read_dir(output).map_err(|e| {
        CoreError::configuration_io(
            format!("cannot read output directory {}", output.display()),
            e,
        )
    })?;
    if entries.next().is_some() && !config.force {
        return Err(CoreError::configuration_with_help(
            format!("output directory {} is not empty", output.display()),
            "pass --force to overwrite the files in place",
        ));
    }

    Ok(())
}
