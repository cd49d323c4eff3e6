//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish the
//! generator's operations: resolve a layout, render files, wire them into
//! existing sources and read generated artifacts back.

pub mod catalog;
pub mod ddd_generator;
pub mod domain_generator;
pub mod file_generator;
pub mod layout_resolver;
pub mod project_generator;
pub mod service_generator;
pub mod source_mutator;

mod recorder;
#[cfg(test)]
mod test_support;

pub use catalog::Catalog;
pub use ddd_generator::DddGenerator;
pub use domain_generator::DomainGenerator;
pub use file_generator::FileGenerator;
pub use layout_resolver::LayoutResolver;
pub use project_generator::ProjectGenerator;
pub use service_generator::ServiceGenerator;
pub use source_mutator::{SourceMutator, WireReport};

use serde::Serialize;

use crate::application::ports::GeneratorPorts;

impl GeneratorPorts {
    pub fn layout_resolver(&self) -> LayoutResolver {
        LayoutResolver::new(self.filesystem.clone())
    }

    pub fn file_generator(&self) -> FileGenerator {
        FileGenerator::new(self.filesystem.clone(), self.renderer.clone())
    }

    pub fn source_mutator(&self) -> SourceMutator {
        SourceMutator::new(self.filesystem.clone(), self.patcher.clone())
    }
}

/// Render data for a freshly seeded application `module.go`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ModuleSeed<'a> {
    pub package_name: &'a str,
}
