//! Process exit codes
//!
//! Sysexits-style where a convention exists.

/// Chart written
pub const SUCCESS: i32 = 0;

/// Unexpected failure
pub const ERROR: i32 = 1;

/// A manifest is not valid YAML or not a valid resource
pub const PARSE_ERROR: i32 = 3;

/// The input directory holds no Kubernetes resources
pub const EMPTY_INPUT: i32 = 4;

/// Reading or writing a file failed
pub const IO_ERROR: i32 = 5;

/// Bad options or directories (sysexits.h EX_USAGE)
pub const USAGE_ERROR: i32 = 64;
