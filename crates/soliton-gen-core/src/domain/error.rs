// ============================================================================
// domain/error.rs - GENERATOR DOMAIN ERRORS
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (results are assembled after the fact)
/// - Categorizable (for CLI and HTTP status mapping)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("{what} is required")]
    MissingName { what: &'static str },

    #[error("{what} '{value}' is invalid (start with a letter; use only letters, digits, '_' or '-')")]
    InvalidName { what: &'static str, value: String },

    #[error("unsupported field type '{type_name}' for field '{field}'")]
    UnsupportedFieldType { field: String, type_name: String },

    #[error("field '{field}' is reserved (provided by the aggregate root)")]
    ReservedField { field: String },

    #[error("field '{field}' is declared more than once")]
    DuplicateField { field: String },

    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("unknown artifact kind '{0}'")]
    UnknownArtifactKind(String),

    // ========================================================================
    // Layout Errors (404-level equivalent)
    // ========================================================================
    #[error("could not locate a project layout from {start} (missing go.mod or internal/ directory)")]
    LayoutNotFound { start: PathBuf },

    #[error("invalid module declaration in {path}: {reason}")]
    InvalidModuleDeclaration { path: PathBuf, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingName { what } => vec![format!("Provide a {what}")],
            Self::InvalidName { .. } => vec![
                "Names must be a single identifier such as 'Order' or 'order_item'".into(),
                "Remove spaces, dots and path separators".into(),
            ],
            Self::UnsupportedFieldType { .. } => vec![
                "Supported types: string, text, int, int64, float64, decimal, bool, time, time?, date, date?, uuid, json, jsonb, bytes, enum(a|b|c)".into(),
                "Try: soliton-gen domain Order --fields \"price:int64,status:enum(paid|open)\"".into(),
            ],
            Self::ReservedField { field } => vec![
                format!("Remove '{field}': id, created_at, updated_at and deleted_at are generated automatically"),
            ],
            Self::DuplicateField { field } => vec![format!("Declare '{field}' only once")],
            Self::LayoutNotFound { .. } => vec![
                "Run the command from inside a project (a directory with go.mod and internal/)".into(),
                "Or pass --dir <project> to point at one".into(),
                "Create a new project with: soliton-gen init <name>".into(),
            ],
            Self::InvalidModuleDeclaration { path, .. } => vec![
                format!("Add a line like 'module github.com/acme/shop' to {}", path.display()),
            ],
            _ => vec!["See `soliton-gen --help` for usage".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::LayoutNotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidModuleDeclaration { .. } => ErrorCategory::Configuration,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}
