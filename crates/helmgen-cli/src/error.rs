//! CLI error type with exit code mapping

use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

use helmgen_core::{CoreError, ErrorClass};

use crate::exit_codes;

/// Pipeline stage an error happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Options,
    Normalize,
    WriteNormalized,
    Generate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Options => "checking options",
            Self::Normalize => "normalizing manifests",
            Self::WriteNormalized => "writing normalized manifests",
            Self::Generate => "generating chart",
        })
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("failed while {stage}")]
    #[diagnostic(code(helmgen::cli::stage))]
    Stage {
        stage: Stage,
        #[source]
        #[diagnostic_source]
        source: CoreError,
    },
}

impl CliError {
    /// Adapter for `map_err`
    pub fn at(stage: Stage) -> impl FnOnce(CoreError) -> Self {
        move |source| Self::Stage { stage, source }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Self::Stage { stage, .. } => *stage,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Stage { source, .. } => match source.class() {
                ErrorClass::Configuration => exit_codes::USAGE_ERROR,
                ErrorClass::Parse => exit_codes::PARSE_ERROR,
                ErrorClass::EmptyInput => exit_codes::EMPTY_INPUT,
                ErrorClass::Io => exit_codes::IO_ERROR,
                ErrorClass::Internal => exit_codes::ERROR,
            },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
