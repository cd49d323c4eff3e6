//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `soliton-gen-adapters` crate provides implementations.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{Edit, Manifest, PatchReport, TemplateId};
use crate::error::GenResult;

/// A directory listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `soliton_gen_adapters::filesystem::LocalFilesystem` (production)
/// - `soliton_gen_adapters::filesystem::MemoryFilesystem` (testing, previews)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> GenResult<()>;

    /// Write content to a file, replacing it when present.
    fn write_file(&self, path: &Path, content: &str) -> GenResult<()>;

    fn read_to_string(&self, path: &Path) -> GenResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Entries of a directory, sorted by name.
    fn read_dir(&self, path: &Path) -> GenResult<Vec<DirEntry>>;

    fn remove_file(&self, path: &Path) -> GenResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> GenResult<()>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `soliton_gen_adapters::renderer::JinjaRenderer` (built-in Go templates)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render a template with serialized render data.
    fn render(&self, template: TemplateId, data: &serde_json::Value) -> GenResult<String>;
}

/// Port for applying wiring edit plans.
///
/// Implemented by:
/// - `soliton_gen_adapters::patcher::MarkerPatcher` (marker and line anchors)
#[cfg_attr(test, mockall::automock)]
pub trait SourcePatcher: Send + Sync {
    /// Apply `edits` in order to `content`. Never fails on a missing anchor;
    /// that is reported per edit in the returned report.
    fn apply(&self, content: &str, edits: &[Edit]) -> GenResult<PatchReport>;
}

/// Port for the side-car artifact manifest.
#[cfg_attr(test, mockall::automock)]
pub trait ManifestStore: Send + Sync {
    /// Load the manifest for a module directory. A missing manifest is empty.
    fn load(&self, module_dir: &Path) -> GenResult<Manifest>;

    fn save(&self, module_dir: &Path, manifest: &Manifest) -> GenResult<()>;
}

/// Port for Go toolchain commands.
#[cfg_attr(test, mockall::automock)]
pub trait Toolchain: Send + Sync {
    /// Run `go mod tidy` in the module directory and return its output.
    fn tidy(&self, module_dir: &Path) -> GenResult<String>;
}

/// The set of ports every generator service works against.
#[derive(Clone)]
pub struct GeneratorPorts {
    pub filesystem: Arc<dyn Filesystem>,
    pub renderer: Arc<dyn TemplateRenderer>,
    pub patcher: Arc<dyn SourcePatcher>,
    pub manifest: Arc<dyn ManifestStore>,
    pub toolchain: Arc<dyn Toolchain>,
}

impl std::fmt::Debug for GeneratorPorts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorPorts").finish_non_exhaustive()
    }
}
