//! Progress output on stdout

use console::style;
use std::fmt::Display;
use std::path::Path;

use helmgen_core::ResourceDescriptor;
use helmgen_synth::{SynthesisReport, TemplateSource};

/// Console printer; prints nothing when quiet
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    quiet: bool,
}

impl Printer {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn header(&self, input_dir: &Path) {
        if self.quiet {
            return;
        }
        println!(
            "{} {}",
            style("Reading Pulumi rendered manifests from").dim(),
            style(input_dir.display()).cyan()
        );
    }

    pub fn resources(&self, resources: &[ResourceDescriptor]) {
        if self.quiet {
            return;
        }
        println!(
            "{} {} resources",
            style("Normalized").bold(),
            resources.len()
        );
        for resource in resources {
            println!("  {} {}", style("-").dim(), resource);
        }
    }

    pub fn warnings<W: Display>(&self, warnings: &[W]) {
        if self.quiet || warnings.is_empty() {
            return;
        }
        println!();
        for warning in warnings {
            println!("  {} {}", style("⚠").yellow(), warning);
        }
        println!();
    }

    pub fn step(&self, message: impl Display) {
        if self.quiet {
            return;
        }
        println!("{} {}", style("→").blue(), message);
    }

    pub fn report(&self, report: &SynthesisReport, output_dir: &Path) {
        if self.quiet {
            return;
        }

        match &report.source {
            TemplateSource::External(dir) => {
                println!("{} {}", style("Post-processed templates from").dim(), dir.display())
            }
            TemplateSource::BuiltIn => println!("{}", style("Generated built-in templates").dim()),
        }

        for template in &report.templates {
            let rel = template
                .path
                .strip_prefix(output_dir)
                .unwrap_or(&template.path);
            println!(
                "  {} {} {}",
                style("✓").green().bold(),
                rel.display(),
                style(format!("({})", template.treatment)).dim()
            );
        }
    }

    pub fn success(&self, output_dir: &Path) {
        if self.quiet {
            return;
        }
        println!();
        println!(
            "{} Helm chart generated at {}",
            style("✓").green().bold(),
            style(output_dir.display()).green()
        );
    }
}
