//! Unified error handling for soliton-gen core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for soliton-gen core operations.
#[derive(Debug, Error, Clone)]
pub enum GenError {
    /// Invalid requests, names, fields or layouts.
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Orchestration failures: I/O, rendering, patching, subprocesses.
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl GenError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check `soliton-gen config list` and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in soliton-gen".into(),
                "Please report it at: https://github.com/soliton-go/soliton-gen/issues".into(),
            ],
        }
    }

    /// Get error category for display and status mapping.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::Application(ApplicationError::NotFound { what: what.into() })
    }
}

/// Error categories for UI display and HTTP status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type GenResult<T> = Result<T, GenError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> GenResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> GenResult<T> {
        self.map_err(|e| GenError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
