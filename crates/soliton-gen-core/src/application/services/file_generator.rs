//! Rendering one template to one file under the write policy.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::application::ApplicationError;
use crate::application::ports::{Filesystem, TemplateRenderer};
use crate::domain::{FileStatus, GeneratedFile, TemplateId};
use crate::error::GenResult;

/// Write policy per file:
///
/// ```text
///   absent                      → render, write        → New
///   present, !force, !preview   → untouched            → Skip
///   present, force              → render, write        → Overwrite
///   present, preview            → render, never write  → Overwrite (would be)
///   render or I/O failure       →                        Error
/// ```
///
/// Content is returned only in preview.
#[derive(Clone)]
pub struct FileGenerator {
    filesystem: Arc<dyn Filesystem>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl FileGenerator {
    pub fn new(filesystem: Arc<dyn Filesystem>, renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self {
            filesystem,
            renderer,
        }
    }

    pub fn render<T: Serialize>(
        &self,
        path: &Path,
        template: TemplateId,
        data: &T,
        force: bool,
        preview: bool,
    ) -> GeneratedFile {
        let exists = self.filesystem.exists(path);
        if exists && !force && !preview {
            debug!(path = %path.display(), "Skipping existing file");
            return GeneratedFile::new(path, FileStatus::Skip);
        }

        let status = if exists {
            FileStatus::Overwrite
        } else {
            FileStatus::New
        };
        self.render_and_write(path, template, data, status, preview)
    }

    /// Like [`render`](Self::render) but never replaces an existing file,
    /// even with `force` or in preview.
    pub fn render_if_absent<T: Serialize>(
        &self,
        path: &Path,
        template: TemplateId,
        data: &T,
        preview: bool,
    ) -> GeneratedFile {
        if self.filesystem.exists(path) {
            return GeneratedFile::new(path, FileStatus::Skip);
        }
        self.render_and_write(path, template, data, FileStatus::New, preview)
    }

    fn render_and_write<T: Serialize>(
        &self,
        path: &Path,
        template: TemplateId,
        data: &T,
        status: FileStatus,
        preview: bool,
    ) -> GeneratedFile {
        match self.try_render_and_write(path, template, data, preview) {
            Ok(content) if preview => GeneratedFile::new(path, status).with_content(content),
            Ok(_) => GeneratedFile::new(path, status),
            Err(err) => {
                warn!(path = %path.display(), %template, error = %err, "File generation failed");
                GeneratedFile::failed(path, err.to_string())
            }
        }
    }

    fn try_render_and_write<T: Serialize>(
        &self,
        path: &Path,
        template: TemplateId,
        data: &T,
        preview: bool,
    ) -> GenResult<String> {
        let value = serde_json::to_value(data).map_err(|e| ApplicationError::RenderingFailed {
            template: template.to_string(),
            reason: e.to_string(),
        })?;
        let content = self.renderer.render(template, &value)?;
        if !preview {
            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(path, &content)?;
        }
        Ok(content)
    }
}
