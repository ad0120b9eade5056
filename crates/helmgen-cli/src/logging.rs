//! Diagnostic logging setup
//!
//! Logs go to stderr so that stdout carries only progress output.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Filter used when `RUST_LOG` is not set
    pub fn default_directive(self) -> &'static str {
        match self {
            Self::Quiet => "off",
            Self::Normal => "warn",
            Self::Verbose => "debug",
        }
    }
}

/// Install the global subscriber; `RUST_LOG` overrides `verbosity`
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
