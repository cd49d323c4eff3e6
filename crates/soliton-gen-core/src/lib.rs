//! soliton-gen core - hexagonal architecture implementation
//!
//! This crate provides the domain and application layers of the soliton-gen
//! code generator, which scaffolds DDD-style Go projects and keeps their
//! wiring up to date, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │   soliton-gen-cli / soliton-gen-server  │
//! │        (Drive the application)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (DomainGenerator, DddGenerator, Catalog)│
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, Renderer, Patcher, Store)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    soliton-gen-adapters (Infrastructure)│
//! │ (LocalFilesystem, JinjaRenderer, etc.)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Naming, Fields, Layout, Wiring plans) │
//! │         No I/O                          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use soliton_gen_core::prelude::*;
//!
//! # fn run(ports: GeneratorPorts) -> GenResult<()> {
//! let mut cfg = DomainConfig::new("Order");
//! cfg.fields = parse_fields("status:enum(pending|paid),total:int64");
//!
//! let result = DomainGenerator::new(ports).generate(Path::new("./shop"), &cfg, false)?;
//! println!("{}", result.message);
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        Catalog, DddGenerator, DomainGenerator, ProjectGenerator, ServiceGenerator,
        ports::{Filesystem, GeneratorPorts, ManifestStore, SourcePatcher, TemplateRenderer, Toolchain},
    };
    pub use crate::domain::{
        ArtifactKind, DeleteResult, DomainConfig, EventConfig, EventHandlerConfig, FileStatus,
        GeneratedFile, GenerationResult, PolicyConfig, ProjectConfig, ServiceConfig,
        SpecificationConfig, TemplateId, ValueObjectConfig, parse_fields,
    };
    pub use crate::error::{ErrorCategory, GenError, GenResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
