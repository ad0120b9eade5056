//! Core error types

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CoreError {
    /// Bad or missing directories, invalid options
    #[error("{message}")]
    #[diagnostic(code(helmgen::configuration))]
    Configuration {
        message: String,
        #[source]
        source: Option<std::io::Error>,
        #[help]
        help: Option<String>,
    },

    #[error("failed to parse {}", file.display())]
    #[diagnostic(
        code(helmgen::parse),
        help("every document must be well-formed YAML")
    )]
    Parse {
        file: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("malformed resource in {}: {message}", file.display())]
    #[diagnostic(code(helmgen::parse::resource))]
    MalformedResource { file: PathBuf, message: String },

    #[error("no Kubernetes resources found in {}", dir.display())]
    #[diagnostic(
        code(helmgen::empty_input),
        help("the input directory needs .yaml or .yml files containing documents with an apiVersion")
    )]
    EmptyInput { dir: PathBuf },

    #[error("failed to read {}", path.display())]
    #[diagnostic(code(helmgen::io::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", path.display())]
    #[diagnostic(code(helmgen::io::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize manifests")]
    #[diagnostic(code(helmgen::serialize))]
    Serialize(#[from] serde_yaml::Error),
}

/// Coarse error classes, one per exit status the CLI reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Configuration,
    Parse,
    EmptyInput,
    Io,
    Internal,
}

impl CoreError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
            help: None,
        }
    }

    /// Create a configuration error with help text
    pub fn configuration_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
            help: Some(help.into()),
        }
    }

    /// Create a configuration error caused by an I/O failure
    pub fn configuration_io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(source),
            help: None,
        }
    }

    pub fn read(path: &Path, source: std::io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn write(path: &Path, source: std::io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Classify this error for exit-code selection
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Configuration { .. } => ErrorClass::Configuration,
            Self::Parse { .. } | Self::MalformedResource { .. } => ErrorClass::Parse,
            Self::EmptyInput { .. } => ErrorClass::EmptyInput,
            Self::Read { .. } | Self::Write { .. } => ErrorClass::Io,
            Self::Serialize(_) => ErrorClass::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
