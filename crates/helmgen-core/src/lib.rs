//! helm-gen Core - shared types for the manifest-to-chart pipeline
//!
//! This crate provides the foundational types used by every stage:
//! - `Document`: one Kubernetes resource as an ordered YAML mapping
//! - `DocumentSet`: the ordered documents read from an input directory
//! - `ResourceDescriptor`: the apiVersion/kind/name summary used for reporting
//! - `ChartOptions` / `NormalizeOptions`: run configuration
//! - `CoreError`: the error taxonomy shared by the normalizer and synthesizer

pub mod annotations;
pub mod document;
pub mod error;
pub mod mapping;
pub mod options;
pub mod visit;

pub use document::{Document, DocumentSet, ResourceDescriptor};
pub use error::{CoreError, ErrorClass, Result};
pub use options::{ChartOptions, LabelMatch, NormalizeOptions};
pub use visit::{ValueVisitor, walk_mut};
