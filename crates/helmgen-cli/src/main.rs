//! helm-gen - Generate a Helm chart from Pulumi-rendered Kubernetes manifests

use clap::Parser;
use std::path::PathBuf;

use helmgen_core::ChartOptions;
use helmgen_core::options::{DEFAULT_CHART_NAME, DEFAULT_CHART_VERSION};

mod display;
mod error;
mod exit_codes;
mod external;
mod logging;
mod pipeline;

use display::Printer;
use error::{CliError, Stage};
use external::{ExternalTransform, Helmify};
use logging::Verbosity;
use pipeline::PipelineConfig;

#[derive(Parser)]
#[command(name = "helm-gen")]
#[command(version)]
#[command(
    about = "Generate a Helm chart from Pulumi-rendered Kubernetes manifests",
    long_about = None
)]
struct Cli {
    /// Directory holding the rendered YAML manifests
    #[arg(long, env = "HELMGEN_INPUT_DIR")]
    input_dir: PathBuf,

    /// Directory the chart is written to
    #[arg(long, env = "HELMGEN_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Chart name
    #[arg(long, env = "HELMGEN_CHART_NAME", default_value = DEFAULT_CHART_NAME)]
    chart_name: String,

    /// Chart version (SemVer)
    #[arg(long, env = "HELMGEN_CHART_VERSION", default_value = DEFAULT_CHART_VERSION)]
    chart_version: String,

    /// Application version (defaults to the chart version)
    #[arg(long, env = "HELMGEN_APP_VERSION")]
    app_version: Option<String>,

    /// Write into a non-empty output directory
    #[arg(long)]
    force: bool,

    /// Skip the external generator and use the built-in templates
    #[arg(long)]
    no_external: bool,

    /// External generator executable
    #[arg(long, env = "HELMGEN_EXTERNAL_BIN", default_value = external::DEFAULT_BINARY)]
    external_bin: String,

    /// Also write the normalized manifest stream to this file
    #[arg(long, value_name = "FILE")]
    emit_normalized: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Print errors only
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    miette::set_panic_hook();

    let cli = Cli::parse();
    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);
    logging::init(verbosity);

    let code = match run(cli, verbosity) {
        Ok(()) => exit_codes::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };

    std::process::exit(code);
}

fn run(cli: Cli, verbosity: Verbosity) -> error::Result<()> {
    let chart = ChartOptions::new(
        &cli.chart_name,
        &cli.chart_version,
        cli.app_version.as_deref(),
    )
    .map_err(CliError::at(Stage::Options))?;

    let config = PipelineConfig {
        input_dir: cli.input_dir,
        output_dir: cli.output_dir,
        chart,
        force: cli.force,
        emit_normalized: cli.emit_normalized,
    };

    let helmify = Helmify::new(cli.external_bin);
    let transform: Option<&dyn ExternalTransform> = if cli.no_external {
        None
    } else {
        Some(&helmify)
    };

    let printer = Printer::new(verbosity == Verbosity::Quiet);
    let summary = pipeline::run(&config, transform, &printer)?;

    tracing::debug!(
        resources = summary.resources,
        warnings = summary.warnings,
        files = summary.report.files().count(),
        "run complete"
    );
    Ok(())
}
