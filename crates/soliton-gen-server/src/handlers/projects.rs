use std::path::{Path, PathBuf};

use axum::extract::{MatchedPath, State};
use serde::{Deserialize, Serialize};
use soliton_gen_core::application::{ApplicationError, ProjectGenerator};
use soliton_gen_core::domain::{GenerationResult, ProjectConfig, ProjectLayout};
use soliton_gen_core::error::GenResult;

use super::meta::LayoutResponse;
use super::{blocking, is_preview, required, ApiJson};
use crate::error::{ApiResult, ServerError};
use crate::state::{AppState, ProjectDir};

#[derive(Debug, Deserialize)]
pub struct InitRequest {
    #[serde(flatten)]
    pub project: ProjectConfig,
    /// Where `<name>` is created. Defaults to the server's project dir.
    #[serde(default)]
    pub parent_dir: Option<PathBuf>,
}

pub async fn init(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    path: MatchedPath,
    ApiJson(req): ApiJson<InitRequest>,
) -> ApiResult<GenerationResult> {
    let preview = is_preview(&path);
    let parent = req.parent_dir.unwrap_or(start);
    blocking(move || {
        ProjectGenerator::new(state.ports)
            .with_module_prefix(state.module_prefix)
            .init(&req.project, &parent, preview)
    })
    .await
}

#[derive(Debug, Default, Deserialize)]
pub struct TidyRequest {
    #[serde(default)]
    pub project_path: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct TidyResponse {
    pub success: bool,
    pub output: String,
}

pub async fn tidy(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    ApiJson(req): ApiJson<TidyRequest>,
) -> ApiResult<TidyResponse> {
    let start = req.project_path.unwrap_or(start);
    blocking(move || {
        let output = ProjectGenerator::new(state.ports).tidy(&start)?;
        Ok(TidyResponse {
            success: true,
            output,
        })
    })
    .await
}

fn absolute(path: &Path) -> GenResult<PathBuf> {
    std::path::absolute(path).map_err(|e| {
        ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
        .into()
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct SwitchRequest {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SwitchResponse {
    pub success: bool,
    pub message: String,
    pub path: PathBuf,
    pub layout: LayoutResponse,
}

/// Points the server at another directory. The switch succeeds for any
/// existing directory; `layout.found` tells whether it holds a project.
pub async fn switch(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SwitchRequest>,
) -> ApiResult<SwitchResponse> {
    let path = PathBuf::from(required("path", req.path)?);
    let dir = absolute(&path)?;
    if !state.ports.filesystem.is_dir(&dir) {
        return Err(ServerError::BadRequest(format!(
            "{} does not exist or is not a directory",
            dir.display()
        )));
    }

    state.switch_project(dir.clone());
    tracing::info!(project_dir = %dir.display(), "Switched project directory");
    blocking(move || {
        let layout = LayoutResponse::from_result(state.ports.layout_resolver().resolve(&dir));
        let message = if layout.found {
            "Switched to project"
        } else {
            "Switched to directory, but no project was detected"
        };
        Ok(SwitchResponse {
            success: true,
            message: message.to_string(),
            path: dir,
            layout,
        })
    })
    .await
}

#[derive(Debug, Serialize)]
pub struct ProjectEntry {
    pub name: String,
    pub path: PathBuf,
    pub module_path: String,
    pub is_current: bool,
}

impl ProjectEntry {
    fn new(layout: ProjectLayout, is_current: bool) -> Self {
        let name = layout
            .module_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            path: layout.module_dir,
            module_path: layout.module_path,
            is_current,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectList {
    pub projects: Vec<ProjectEntry>,
}

/// The current project first, then sibling projects of the project
/// directory.
pub async fn list(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
) -> ApiResult<ProjectList> {
    blocking(move || {
        let resolver = state.ports.layout_resolver();
        let start = absolute(&start)?;
        let current = resolver.resolve(&start).ok();
        let current_dir = current.as_ref().map(|layout| layout.module_dir.clone());

        let siblings = match start.parent() {
            Some(parent) => resolver.projects_in(parent).unwrap_or_else(|err| {
                tracing::debug!(parent = %parent.display(), error = %err, "No sibling projects");
                Vec::new()
            }),
            None => Vec::new(),
        };

        let projects = current
            .map(|layout| ProjectEntry::new(layout, true))
            .into_iter()
            .chain(
                siblings
                    .into_iter()
                    .filter(|layout| Some(&layout.module_dir) != current_dir.as_ref())
                    .map(|layout| ProjectEntry::new(layout, false)),
            )
            .collect();
        Ok(ProjectList { projects })
    })
    .await
}
