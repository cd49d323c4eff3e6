//! Source patching adapters.

mod marker;

pub use marker::MarkerPatcher;
