use thiserror::Error;

use crate::collab::DeviceError;

/// Fatal compilation failures. Any of these aborts the run with no output.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Mask-length range is malformed or out of bounds for its prefix.
    #[error("invalid masklength range '{range}' for {prefix}: {reason}")]
    RangeValidation {
        range: String,
        prefix: String,
        reason: String,
    },
    /// A policy or binding names an object that is not declared.
    #[error("{kind} '{name}' referenced by {referrer} is not declared")]
    MissingReference {
        kind: &'static str,
        name: String,
        referrer: String,
    },
    /// Declared intent conflicts with what the device reports.
    #[error("configuration mismatch: {0}")]
    ConfigMismatch(String),
    #[error("unsupported vendor '{0}' (expected eos, junos or sonic)")]
    UnsupportedVendor(String),
    /// Duplicate names or structurally unusable declarations.
    #[error("invalid declaration: {0}")]
    InvalidDeclaration(String),
    #[error("template rendering failed: {0}")]
    Render(String),
    /// Device state required for a safe decision could not be read.
    #[error("device state unavailable: {0}")]
    DeviceState(#[from] DeviceError),
}
