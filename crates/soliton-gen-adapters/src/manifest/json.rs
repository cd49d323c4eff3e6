//! `.soliton-gen/manifest.json` persistence.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use soliton_gen_core::application::ApplicationError;
use soliton_gen_core::application::ports::{Filesystem, ManifestStore};
use soliton_gen_core::domain::Manifest;
use soliton_gen_core::error::GenResult;

pub const MANIFEST_DIR: &str = ".soliton-gen";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Stores the manifest as pretty-printed JSON through a [`Filesystem`].
#[derive(Clone)]
pub struct JsonManifestStore {
    fs: Arc<dyn Filesystem>,
}

impl std::fmt::Debug for JsonManifestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonManifestStore").finish_non_exhaustive()
    }
}

impl JsonManifestStore {
    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        Self { fs }
    }

    pub fn path(module_dir: &Path) -> PathBuf {
        module_dir.join(MANIFEST_DIR).join(MANIFEST_FILE)
    }
}

fn manifest_error(path: &Path, err: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::ManifestError {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

impl ManifestStore for JsonManifestStore {
    #[instrument(skip(self), fields(module_dir = %module_dir.display()))]
    fn load(&self, module_dir: &Path) -> GenResult<Manifest> {
        let path = Self::path(module_dir);
        if !self.fs.is_file(&path) {
            debug!("No manifest yet");
            return Ok(Manifest::default());
        }
        let content = self.fs.read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Manifest::default());
        }
        let manifest: Manifest =
            serde_json::from_str(&content).map_err(|e| manifest_error(&path, e))?;
        debug!(entries = manifest.entries.len(), "Manifest loaded");
        Ok(manifest)
    }

    #[instrument(skip(self, manifest), fields(module_dir = %module_dir.display(), entries = manifest.entries.len()))]
    fn save(&self, module_dir: &Path, manifest: &Manifest) -> GenResult<()> {
        let path = Self::path(module_dir);
        let mut json =
            serde_json::to_string_pretty(manifest).map_err(|e| manifest_error(&path, e))?;
        json.push('\n');
        self.fs.create_dir_all(&module_dir.join(MANIFEST_DIR))?;
        self.fs.write_file(&path, &json)
    }
}

/// Manifest store that records nothing; used when the manifest is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopManifestStore;

impl ManifestStore for NoopManifestStore {
    fn load(&self, _module_dir: &Path) -> GenResult<Manifest> {
        Ok(Manifest::default())
    }

    fn save(&self, _module_dir: &Path, _manifest: &Manifest) -> GenResult<()> {
        Ok(())
    }
}
