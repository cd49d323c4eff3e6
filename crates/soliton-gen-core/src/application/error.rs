//! Application layer errors.
//!
//! These errors represent failures in orchestration, not request validation.
//! Validation errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Template rendering failed.
    #[error("template '{template}' failed to render: {reason}")]
    RenderingFailed { template: String, reason: String },

    /// Filesystem operation failed.
    #[error("filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A source file could not be patched.
    #[error("could not patch {path}: {reason}")]
    PatchFailed { path: PathBuf, reason: String },

    /// A domain, service or artifact does not exist.
    #[error("{what} not found")]
    NotFound { what: String },

    /// A rename or create would clobber an existing artifact.
    #[error("{what} already exists")]
    AlreadyExists { what: String },

    /// The manifest could not be read or written.
    #[error("manifest error at {path}: {reason}")]
    ManifestError { path: PathBuf, reason: String },

    /// An external command (e.g. `go mod tidy`) failed.
    #[error("`{command}` failed: {reason}")]
    ExternalCommand { command: String, reason: String },

    /// In-memory store lock poisoned.
    #[error("store lock poisoned")]
    StoreLockError,

    /// Validation failed (application-level, not domain).
    #[error("{0}")]
    ValidationFailed(String),
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::PatchFailed { path, .. } => vec![
                format!("Register the new code in {} by hand", path.display()),
                "Restore the `// soliton-gen:` marker comments to re-enable automatic wiring"
                    .into(),
            ],
            Self::NotFound { .. } => vec![
                "Check the name and the project directory".into(),
                "Try: soliton-gen domain list".into(),
            ],
            Self::AlreadyExists { .. } => vec!["Pass force to replace it".into()],
            Self::ExternalCommand { command, .. } => vec![
                format!("Run `{command}` manually to see the full output"),
                "Ensure the Go toolchain is installed and on PATH".into(),
            ],
            Self::StoreLockError => vec![
                "The in-memory store is locked".into(),
                "Try again in a moment".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::AlreadyExists { .. } | Self::ValidationFailed(_) => ErrorCategory::Validation,
            Self::ExternalCommand { .. } => ErrorCategory::Configuration,
            Self::RenderingFailed { .. }
            | Self::FilesystemError { .. }
            | Self::PatchFailed { .. }
            | Self::ManifestError { .. }
            | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
