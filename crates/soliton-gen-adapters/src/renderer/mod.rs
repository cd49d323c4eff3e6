//! Template rendering adapters.

mod jinja;

pub use jinja::{JinjaRenderer, TEMPLATES_DIR_ENV};
