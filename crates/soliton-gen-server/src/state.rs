use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use soliton_gen_core::application::ports::GeneratorPorts;
use soliton_gen_core::domain::template_data::DEFAULT_MODULE_PREFIX;

/// Shared by every handler. Cloning is cheap; the ports are `Arc`s and the
/// project directory is shared, so a switch is seen by every clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub ports: GeneratorPorts,
    project_dir: Arc<RwLock<PathBuf>>,
    pub module_prefix: String,
}

impl AppState {
    pub fn new(ports: GeneratorPorts, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            ports,
            project_dir: Arc::new(RwLock::new(project_dir.into())),
            module_prefix: DEFAULT_MODULE_PREFIX.to_string(),
        }
    }

    pub fn with_module_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.module_prefix = prefix.into();
        self
    }

    /// Start directory for layout discovery and parent of new projects.
    pub fn project_dir(&self) -> PathBuf {
        self.project_dir
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-targets every later request at `dir`.
    pub fn switch_project(&self, dir: PathBuf) {
        *self.project_dir.write().unwrap_or_else(PoisonError::into_inner) = dir;
    }
}

/// The project directory as of the start of the request.
#[derive(Debug, Clone)]
pub struct ProjectDir(pub PathBuf);

#[async_trait]
impl FromRequestParts<AppState> for ProjectDir {
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self(state.project_dir()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ports() -> GeneratorPorts {
        soliton_gen_adapters::memory_ports(soliton_gen_adapters::MemoryFilesystem::new()).unwrap()
    }

    #[test]
    fn switching_is_visible_to_clones() {
        let state = AppState::new(ports(), "/work/shop");
        let handler_copy = state.clone();
        state.switch_project(PathBuf::from("/work/billing"));
        assert_eq!(handler_copy.project_dir(), PathBuf::from("/work/billing"));
    }
}
