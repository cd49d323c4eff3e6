//! Application layer for soliton-gen.
//!
//! This layer contains:
//! - **Services**: use case orchestration (generators, catalog, wiring)
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! generation rules itself. Names, plans and render data live in
//! `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    Catalog, DddGenerator, DomainGenerator, FileGenerator, LayoutResolver, ProjectGenerator,
    ServiceGenerator, SourceMutator, WireReport,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    DirEntry, Filesystem, GeneratorPorts, ManifestStore, SourcePatcher, TemplateRenderer,
    Toolchain,
};

pub use error::ApplicationError;
