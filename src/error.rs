//! Error handling module for uspin
//!
//! Provides the single error type returned by the spec loader and the
//! operation dispatcher. Collaborator failures (configuration parser,
//! package-list parser, package manager) are carried through unchanged.

use std::path::PathBuf;
use thiserror::Error;

use crate::engine::operation::OperationKind;

/// Main error type for uspin
#[derive(Error, Debug)]
pub enum SpinError {
    /// The input path does not carry the `.spin` suffix
    #[error("Not a .spin file: {}", path.display())]
    InvalidInput { path: PathBuf },

    /// The base configuration could not be loaded
    #[error(transparent)]
    ConfigLoadFailed(anyhow::Error),

    /// The directory of the .spin file could not be made absolute
    #[error(transparent)]
    PathResolutionFailed(std::io::Error),

    /// The package list could not be parsed into operations
    #[error(transparent)]
    PackageListParseFailed(anyhow::Error),

    /// The dispatcher was handed nothing to do
    #[error("Internal error: 0 operations passed to the dispatcher")]
    EmptyOperationList,

    /// Operation that no dispatcher path knows how to apply
    #[error("Unknown or unsupported operation requested: {directive}")]
    UnsupportedOperation { directive: String },

    /// A batch whose elements do not all share the first element's kind
    #[error("Mixed operation kinds: expected {expected} but found {found} at index {index}")]
    MixedOperationKinds {
        expected: OperationKind,
        found: OperationKind,
        index: usize,
    },

    /// The package manager rejected a call
    #[error(transparent)]
    PackageManager(anyhow::Error),
}

/// Result type alias for uspin operations
pub type Result<T> = std::result::Result<T, SpinError>;

impl SpinError {
    /// Create an invalid input error for the given path
    pub fn invalid_input(path: impl Into<PathBuf>) -> Self {
        Self::InvalidInput { path: path.into() }
    }

    /// Create an unsupported operation error
    pub fn unsupported(directive: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            directive: directive.into(),
        }
    }
}
