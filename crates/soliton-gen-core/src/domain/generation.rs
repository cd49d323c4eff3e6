//! Generation results reported to every caller.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What happened (or would happen, in preview) to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    New,
    Overwrite,
    Skip,
    Error,
}

impl FileStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Overwrite => "overwrite",
            Self::Skip => "skip",
            Self::Error => "error",
        }
    }

    /// Whether the file was (or would be) written.
    pub const fn writes(&self) -> bool {
        matches!(self, Self::New | Self::Overwrite)
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub status: FileStatus,
    /// Rendered content; only populated in preview mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Why the file ended up in `Error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GeneratedFile {
    pub fn new(path: impl Into<PathBuf>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            status,
            content: None,
            error: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::new(path, FileStatus::Error)
        }
    }
}

/// Aggregated outcome of one generation operation.
///
/// `success` is false iff some file ended in [`FileStatus::Error`];
/// [`GenerationResult::finish`] keeps that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationResult {
    pub success: bool,
    pub files: Vec<GeneratedFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub message: String,
}

impl GenerationResult {
    pub fn new() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn push(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn extend(&mut self, other: GenerationResult) {
        self.files.extend(other.files);
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Whether at least one file was (or would be) written.
    pub fn wrote_any(&self) -> bool {
        self.files.iter().any(|f| f.status.writes())
    }

    pub fn count(&self, status: FileStatus) -> usize {
        self.files.iter().filter(|f| f.status == status).count()
    }

    /// Recomputes `success` and `errors` from the file list and sets the
    /// message.
    pub fn finish(mut self, message: impl Into<String>) -> Self {
        for file in self.files.iter().filter(|f| f.status == FileStatus::Error) {
            let reason = file.error.as_deref().unwrap_or("generation failed");
            let line = format!("{}: {}", file.path.display(), reason);
            if !self.errors.contains(&line) {
                self.errors.push(line);
            }
        }
        self.success = self.files.iter().all(|f| f.status != FileStatus::Error);
        self.message = message.into();
        self
    }
}

/// Outcome of a delete operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeleteResult {
    pub success: bool,
    pub deleted_items: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    pub message: String,
}

impl DeleteResult {
    pub fn finish(mut self, message: impl Into<String>) -> Self {
        self.success = self.errors.is_empty();
        self.message = message.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_tracks_error_files() {
        let mut result = GenerationResult::new();
        result.push(GeneratedFile::new("a.go", FileStatus::New));
        result.push(GeneratedFile::new("b.go", FileStatus::Skip));
        let ok = result.clone().finish("done");
        assert!(ok.success);
        assert!(ok.errors.is_empty());
        assert_eq!(ok.message, "done");

        result.push(GeneratedFile::failed("c.go", "disk full"));
        let failed = result.finish("done");
        assert!(!failed.success);
        assert_eq!(failed.errors, vec!["c.go: disk full".to_string()]);
    }

    #[test]
    fn status_serializes_lowercase() {
        let file = GeneratedFile::new("x.go", FileStatus::Overwrite);
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["status"], "overwrite");
        assert!(json.get("content").is_none());
    }

    #[test]
    fn wrote_any_ignores_skips() {
        let mut result = GenerationResult::new();
        result.push(GeneratedFile::new("a.go", FileStatus::Skip));
        assert!(!result.wrote_any());
        result.push(GeneratedFile::new("b.go", FileStatus::Overwrite));
        assert!(result.wrote_any());
        assert_eq!(result.count(FileStatus::Skip), 1);
    }

    #[test]
    fn delete_result_succeeds_without_errors() {
        let result = DeleteResult {
            deleted_items: vec!["domain/order".into()],
            ..DeleteResult::default()
        }
        .finish("Domain order deleted");
        assert!(result.success);
    }
}
