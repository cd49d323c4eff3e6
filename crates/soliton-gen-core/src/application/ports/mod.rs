//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `soliton-gen-adapters` implement
//! these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: file operations
//!   - `TemplateRenderer`: Go template rendering
//!   - `SourcePatcher`: applies wiring edit plans to source text
//!   - `ManifestStore`: side-car artifact manifest
//!   - `Toolchain`: Go toolchain commands

pub mod output;

pub use output::{
    DirEntry, Filesystem, GeneratorPorts, ManifestStore, SourcePatcher, TemplateRenderer,
    Toolchain,
};

#[cfg(test)]
pub use output::{
    MockFilesystem, MockManifestStore, MockSourcePatcher, MockTemplateRenderer, MockToolchain,
};
