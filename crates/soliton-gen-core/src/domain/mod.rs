// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for soliton-gen.
//!
//! Pure generator logic: naming, field resolution, layout model, render data,
//! write results, wiring plans and the artifact manifest. All I/O (files,
//! templates, subprocesses) goes through the ports in
//! [`crate::application::ports`].
//!
//! ## Rules
//!
//! - **No I/O**: functions here take and return values
//! - **Deterministic**: the same input always yields the same names and plans
//! - **Fail fast**: builders stop at the first invalid input
pub mod artifact;
pub mod config;
pub mod error;
pub mod field;
pub mod generation;
pub mod layout;
pub mod manifest;
pub mod naming;
pub mod patch;
pub mod readback;
pub mod template_data;
pub mod templates;
pub mod wiring;

pub use artifact::ArtifactKind;
pub use config::{
    DomainConfig, EventConfig, EventHandlerConfig, PolicyConfig, ProjectConfig, ServiceConfig,
    SpecificationConfig, ValueObjectConfig,
};
pub use error::{DomainError, ErrorCategory};
pub use field::{EnumConstant, Field, FieldConfig, FieldType, parse_fields};
pub use generation::{DeleteResult, FileStatus, GeneratedFile, GenerationResult};
pub use layout::ProjectLayout;
pub use manifest::{Manifest, ManifestEntry};
pub use patch::{Anchor, Edit, EditKind, EditOutcome, PatchReport};
pub use readback::{
    ArtifactDetail, ArtifactItem, ArtifactListing, ArtifactSource, DomainDetail, DomainFiles,
    DomainSummary, FieldDetail, ServiceDetection, ServiceInfo, ServiceMethodInfo, ServiceType,
};
pub use template_data::{
    EntityData, EventData, EventHandlerData, PolicyData, ProjectData, ServiceData,
    SpecificationData, ValueObjectData,
};
pub use templates::TemplateId;
pub use wiring::WireMode;
