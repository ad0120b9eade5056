//! Non-fatal findings reported by the normalizer

use std::fmt;

/// Why a ServiceAccount name collision could not be fully resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollisionReason {
    /// None of the colliding accounts carries the primary workload label
    NoPrimary,
    /// More than one colliding account carries the primary workload label
    MultiplePrimaries,
    /// A colliding account already uses the base name without a generated suffix
    UnmarkedMember(String),
    /// The fallback name is already used by another ServiceAccount
    FallbackTaken(String),
    /// Only one account can take the fallback name
    TooManyAccounts,
}

impl fmt::Display for CollisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPrimary => write!(f, "no account carries the primary workload label"),
            Self::MultiplePrimaries => {
                write!(f, "several accounts carry the primary workload label")
            }
            Self::UnmarkedMember(name) => {
                write!(f, "'{}' already uses the name without a generated suffix", name)
            }
            Self::FallbackTaken(name) => write!(f, "'{}' is already in use", name),
            Self::TooManyAccounts => write!(f, "only one account can take the fallback name"),
        }
    }
}

/// Something the normalizer could not handle cleanly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeWarning {
    /// ServiceAccounts collapsing to the same base name kept their original names
    UnresolvedCollision {
        base: String,
        kept: Vec<String>,
        reason: CollisionReason,
    },
    /// A Secret value was not valid base64 or not UTF-8, and was copied verbatim
    UndecodableSecretValue { secret: String, key: String },
}

impl fmt::Display for NormalizeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedCollision { base, kept, reason } => write!(
                f,
                "ServiceAccount name collision on '{}' ({}); keeping original names: {}",
                base,
                reason,
                kept.join(", ")
            ),
            Self::UndecodableSecretValue { secret, key } => write!(
                f,
                "Secret '{}': value of '{}' is not base64-encoded UTF-8, copied as-is",
                secret, key
            ),
        }
    }
}
