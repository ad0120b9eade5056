//! helm-gen Normalize - turns Pulumi-rendered manifests into a stable stream
//!
//! Pulumi renders Kubernetes resources with provider-specific noise that
//! makes them unsuitable as chart templates:
//!
//! - auto-generated name suffixes (`workflow-agent-e17e131b`), different
//!   on every stack
//! - `pulumi.com/*` annotations
//! - base64-encoded Secret `data`
//!
//! The [`Normalizer`] strips the suffixes and propagates the new names to
//! every reference, resolves the ServiceAccount collision this creates, drops
//! vendor annotations and rewrites Secrets to plain-text `stringData`.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! let output = helmgen_normalize::normalize(Path::new("./rendered")).unwrap();
//! for resource in &output.resources {
//!     println!("{}", resource);
//! }
//! output.write_to(Path::new("./work/all.yaml")).unwrap();
//! ```

pub mod annotations;
pub mod collision;
pub mod loader;
pub mod normalizer;
pub mod rename;
pub mod secret;
pub mod warning;

use std::path::Path;

use helmgen_core::Result;

pub use normalizer::{NormalizedOutput, Normalizer};
pub use rename::RenameMap;
pub use warning::{CollisionReason, NormalizeWarning};

/// Normalize `input_dir` with the default options
pub fn normalize(input_dir: &Path) -> Result<NormalizedOutput> {
    Normalizer::default().run(input_dir)
}
