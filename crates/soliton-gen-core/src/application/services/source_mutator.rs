//! Applying wiring edit plans to files on disk.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::ports::{Filesystem, SourcePatcher};
use crate::domain::{Edit, FileStatus, GeneratedFile};
use crate::error::GenResult;

/// Result of wiring one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireReport {
    pub file: GeneratedFile,
    /// One entry per edit whose anchors were all missing.
    pub warnings: Vec<String>,
}

/// Reads a file, applies an edit plan in memory and writes it back once.
#[derive(Clone)]
pub struct SourceMutator {
    filesystem: Arc<dyn Filesystem>,
    patcher: Arc<dyn SourcePatcher>,
}

impl SourceMutator {
    pub fn new(filesystem: Arc<dyn Filesystem>, patcher: Arc<dyn SourcePatcher>) -> Self {
        Self {
            filesystem,
            patcher,
        }
    }

    /// Reports `Overwrite` when the plan changed the file and `Skip` when
    /// everything was already wired.
    #[instrument(skip_all, fields(path = %path.display(), edits = edits.len()))]
    pub fn patch_file(&self, path: &Path, edits: &[Edit], preview: bool) -> GenResult<WireReport> {
        let content = self.filesystem.read_to_string(path)?;
        self.apply(path, &content, edits, FileStatus::Overwrite, preview)
    }

    /// Creates the file from `seed` when absent (reported `New`), then
    /// applies the plan.
    pub fn ensure_file(
        &self,
        path: &Path,
        seed: impl FnOnce() -> GenResult<String>,
        edits: &[Edit],
        preview: bool,
    ) -> GenResult<WireReport> {
        if self.filesystem.exists(path) {
            return self.patch_file(path, edits, preview);
        }
        let content = seed()?;
        debug!(path = %path.display(), "Seeding missing file");
        self.apply(path, &content, edits, FileStatus::New, preview)
    }

    fn apply(
        &self,
        path: &Path,
        content: &str,
        edits: &[Edit],
        changed_status: FileStatus,
        preview: bool,
    ) -> GenResult<WireReport> {
        let report = self.patcher.apply(content, edits)?;
        let warnings: Vec<String> = report
            .missing()
            .map(|label| {
                format!(
                    "{}: no anchor found for '{}'; add it by hand",
                    path.display(),
                    label
                )
            })
            .collect();
        for warning in &warnings {
            warn!("{warning}");
        }

        let seeded = changed_status == FileStatus::New;
        if !report.changed() && !seeded {
            debug!(path = %path.display(), "Already wired");
            return Ok(WireReport {
                file: GeneratedFile::new(path, FileStatus::Skip),
                warnings,
            });
        }

        let file = if preview {
            GeneratedFile::new(path, changed_status).with_content(report.content)
        } else {
            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(path, &report.content)?;
            info!(path = %path.display(), "Wired");
            GeneratedFile::new(path, changed_status)
        };

        Ok(WireReport { file, warnings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockFilesystem, MockSourcePatcher};
    use crate::domain::{Anchor, EditOutcome, PatchReport};

    fn edits() -> Vec<Edit> {
        vec![Edit::insert(
            "module orderapp",
            "orderapp.Module,",
            vec![Anchor::Marker("// soliton-gen:modules".into())],
        )]
    }

    fn patcher(outcome: EditOutcome, content: &'static str) -> MockSourcePatcher {
        let mut patcher = MockSourcePatcher::new();
        patcher.expect_apply().returning(move |_, edits| {
            Ok(PatchReport {
                content: content.to_string(),
                outcomes: edits.iter().map(|e| (e.label.clone(), outcome)).collect(),
            })
        });
        patcher
    }

    #[test]
    fn changed_file_is_written_once() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string().returning(|_| Ok("before".into()));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file()
            .withf(|_, content| content.starts_with("after"))
            .times(1)
            .returning(|_, _| Ok(()));

        let report = SourceMutator::new(Arc::new(fs), Arc::new(patcher(EditOutcome::Applied, "after")))
            .patch_file(Path::new("/p/cmd/main.go"), &edits(), false)
            .unwrap();
        assert_eq!(report.file.status, FileStatus::Overwrite);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn already_wired_file_is_skipped() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string().returning(|_| Ok("same".into()));
        fs.expect_write_file().never();

        let report =
            SourceMutator::new(Arc::new(fs), Arc::new(patcher(EditOutcome::AlreadyPresent, "same")))
                .patch_file(Path::new("/p/cmd/main.go"), &edits(), false)
                .unwrap();
        assert_eq!(report.file.status, FileStatus::Skip);
    }

    #[test]
    fn missing_anchor_is_a_warning() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string().returning(|_| Ok("same".into()));
        fs.expect_write_file().never();

        let report =
            SourceMutator::new(Arc::new(fs), Arc::new(patcher(EditOutcome::AnchorMissing, "same")))
                .patch_file(Path::new("/p/cmd/main.go"), &edits(), false)
                .unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("module orderapp"));
    }

    #[test]
    fn ensure_file_seeds_missing_file_in_preview() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_write_file().never();

        let report =
            SourceMutator::new(Arc::new(fs), Arc::new(patcher(EditOutcome::Applied, "seeded+edit")))
                .ensure_file(
                    Path::new("/p/internal/application/order/module.go"),
                    || Ok("seeded".into()),
                    &edits(),
                    true,
                )
                .unwrap();
        assert_eq!(report.file.status, FileStatus::New);
        assert_eq!(report.file.content.as_deref(), Some("seeded+edit"));
    }
}
