//! External template generator
//!
//! `helmify` turns a manifest stream into per-kind chart templates. It is
//! optional: any failure here is reported and the built-in templates are
//! used instead.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

/// Default generator executable
pub const DEFAULT_BINARY: &str = "helmify";

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("{binary} not found")]
    NotFound {
        binary: String,
        #[source]
        source: which::Error,
    },

    #[error("failed to prepare {}", path.display())]
    Prepare {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch {}", program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} exited with {status}", program.display())]
    Failed { program: PathBuf, status: ExitStatus },
}

/// A tool turning a manifest stream into chart templates
pub trait ExternalTransform {
    fn name(&self) -> &str;

    /// Read the stream at `input` and populate `chart_dir/templates`
    fn transform(&self, input: &Path, chart_dir: &Path) -> Result<(), TransformError>;
}

/// The `helmify` command line tool
#[derive(Debug, Clone)]
pub struct Helmify {
    binary: String,
}

impl Helmify {
    /// `binary` is a name looked up on `PATH`, or a path
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn locate(&self) -> Result<PathBuf, TransformError> {
        which::which(&self.binary).map_err(|source| TransformError::NotFound {
            binary: self.binary.clone(),
            source,
        })
    }
}

impl Default for Helmify {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY)
    }
}

impl ExternalTransform for Helmify {
    fn name(&self) -> &str {
        &self.binary
    }

    fn transform(&self, input: &Path, chart_dir: &Path) -> Result<(), TransformError> {
        let program = self.locate()?;
        tracing::info!("using {}", program.display());

        if let Some(parent) = chart_dir.parent() {
            fs::create_dir_all(parent).map_err(|source| TransformError::Prepare {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let stdin = File::open(input).map_err(|source| TransformError::Prepare {
            path: input.to_path_buf(),
            source,
        })?;

        let status = Command::new(&program)
            .arg("-crd-dir")
            .arg(chart_dir)
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| TransformError::Launch {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(TransformError::Failed { program, status });
        }
        Ok(())
    }
}
