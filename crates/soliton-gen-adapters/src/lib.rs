//! Infrastructure adapters for soliton-gen.
//!
//! This crate implements the ports defined in
//! `soliton_gen_core::application::ports`. It contains all I/O: the local
//! and in-memory filesystems, the minijinja Go templates, the marker
//! patcher, the JSON manifest and the `go` toolchain.

pub mod filesystem;
pub mod manifest;
pub mod patcher;
pub mod renderer;
pub mod toolchain;

use std::sync::Arc;

use soliton_gen_core::application::ports::{Filesystem, GeneratorPorts, ManifestStore};
use soliton_gen_core::error::GenResult;

pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use manifest::{JsonManifestStore, NoopManifestStore};
pub use patcher::MarkerPatcher;
pub use renderer::{JinjaRenderer, TEMPLATES_DIR_ENV};
pub use toolchain::GoToolchain;

/// Options for assembling [`GeneratorPorts`].
#[derive(Debug, Clone, Default)]
pub struct PortOptions {
    /// Directory of `<template>.j2` overrides. Falls back to
    /// `$SOLITON_GEN_TEMPLATES_DIR`.
    pub templates_dir: Option<std::path::PathBuf>,
    /// Record generated artifacts in `.soliton-gen/manifest.json`.
    pub manifest: bool,
}

impl PortOptions {
    pub fn new() -> Self {
        Self {
            templates_dir: None,
            manifest: true,
        }
    }
}

/// Ports over an arbitrary filesystem.
pub fn ports_with(fs: Arc<dyn Filesystem>, options: &PortOptions) -> GenResult<GeneratorPorts> {
    let renderer = match &options.templates_dir {
        Some(dir) => JinjaRenderer::builtin()?.with_override_dir(dir)?,
        None => JinjaRenderer::new()?,
    };
    let manifest: Arc<dyn ManifestStore> = if options.manifest {
        Arc::new(JsonManifestStore::new(fs.clone()))
    } else {
        Arc::new(NoopManifestStore)
    };

    Ok(GeneratorPorts {
        filesystem: fs,
        renderer: Arc::new(renderer),
        patcher: Arc::new(MarkerPatcher::new()),
        manifest,
        toolchain: Arc::new(GoToolchain::new()),
    })
}

/// Production ports on the local disk.
pub fn local_ports(options: &PortOptions) -> GenResult<GeneratorPorts> {
    ports_with(Arc::new(LocalFilesystem::new()), options)
}

/// Ports on an in-memory filesystem, for tests and dry runs.
pub fn memory_ports(fs: MemoryFilesystem) -> GenResult<GeneratorPorts> {
    ports_with(Arc::new(fs), &PortOptions::new())
}
