//! Error types for shadow contract handling
//!
//! All fallible operations return `Result<T, Error>`.
//! Only `SignatureMismatch` is meant to reach a human; the resolution host
//! handles every other kind locally and keeps walking.

use std::path::PathBuf;

use crate::model::TypeIdentity;
use crate::validator::Discrepancy;

/// Shadow contract error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A shadow operation does not structurally match its real type
    #[error("Signature mismatch on {target}::{operation}: {discrepancy}")]
    SignatureMismatch {
        target: TypeIdentity,
        operation: String,
        discrepancy: Discrepancy,
    },

    /// A search location is missing or unreadable at resolution time
    #[error("Location unavailable: {}: {reason}", .path.display())]
    LocationUnavailable { path: PathBuf, reason: String },

    /// An artifact on disk could not be decoded
    #[error("Malformed artifact {}: {reason}", .path.display())]
    MalformedArtifact { path: PathBuf, reason: String },

    /// Filesystem failure outside of a resolution walk
    #[error("I/O error: {0}")]
    Io(String),

    /// Invalid host configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// Result type alias for shadow contract operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_mismatch_display_names_operation() {
        let err = Error::SignatureMismatch {
            target: TypeIdentity::new("System", "IConvertible"),
            operation: "ToFoo".into(),
            discrepancy: Discrepancy::NotOnRealType,
        };
        let text = err.to_string();
        assert!(text.contains("System.IConvertible::ToFoo"), "got: {}", text);
        assert!(text.contains("no operation"), "got: {}", text);
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(ref msg) if msg.contains("gone")));
    }
}
