//! Go toolchain adapters.

mod go;

pub use go::GoToolchain;
