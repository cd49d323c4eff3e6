//! Artifact manifest adapters.

mod json;

pub use json::{JsonManifestStore, NoopManifestStore};
