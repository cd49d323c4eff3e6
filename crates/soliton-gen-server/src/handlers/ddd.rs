//! Value objects, specifications, policies, events and event handlers.

use axum::extract::{MatchedPath, Query, State};
use serde::Deserialize;
use soliton_gen_core::application::{Catalog, DddGenerator};
use soliton_gen_core::domain::{
    ArtifactDetail, ArtifactKind, ArtifactListing, ArtifactSource, DeleteResult, EventConfig,
    EventHandlerConfig, GenerationResult, PolicyConfig, SpecificationConfig, ValueObjectConfig,
};
use soliton_gen_core::error::GenError;

use super::{blocking, is_preview, required, ApiJson};
use crate::error::{ApiResult, ServerError};
use crate::state::{AppState, ProjectDir};

pub async fn value_object(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    path: MatchedPath,
    ApiJson(cfg): ApiJson<ValueObjectConfig>,
) -> ApiResult<GenerationResult> {
    let preview = is_preview(&path);
    blocking(move || DddGenerator::new(state.ports).value_object(&start, &cfg, preview)).await
}

pub async fn specification(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    path: MatchedPath,
    ApiJson(cfg): ApiJson<SpecificationConfig>,
) -> ApiResult<GenerationResult> {
    let preview = is_preview(&path);
    blocking(move || DddGenerator::new(state.ports).specification(&start, &cfg, preview)).await
}

pub async fn policy(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    path: MatchedPath,
    ApiJson(cfg): ApiJson<PolicyConfig>,
) -> ApiResult<GenerationResult> {
    let preview = is_preview(&path);
    blocking(move || DddGenerator::new(state.ports).policy(&start, &cfg, preview)).await
}

pub async fn event(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    path: MatchedPath,
    ApiJson(cfg): ApiJson<EventConfig>,
) -> ApiResult<GenerationResult> {
    let preview = is_preview(&path);
    blocking(move || DddGenerator::new(state.ports).event(&start, &cfg, preview)).await
}

pub async fn event_handler(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    path: MatchedPath,
    ApiJson(cfg): ApiJson<EventHandlerConfig>,
) -> ApiResult<GenerationResult> {
    let preview = is_preview(&path);
    blocking(move || DddGenerator::new(state.ports).event_handler(&start, &cfg, preview)).await
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtifactQuery {
    pub domain: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
}

/// `domain`, `type` and `name`, all required.
struct ArtifactRef {
    domain: String,
    kind: ArtifactKind,
    name: String,
}

fn parse_kind(kind: &str) -> Result<ArtifactKind, ServerError> {
    kind.parse::<ArtifactKind>()
        .map_err(|e| ServerError::Gen(GenError::from(e)))
}

impl TryFrom<ArtifactQuery> for ArtifactRef {
    type Error = ServerError;

    fn try_from(query: ArtifactQuery) -> Result<Self, Self::Error> {
        let domain = required("domain", query.domain)?;
        let kind = parse_kind(&required("type", query.kind)?)?;
        let name = required("name", query.name)?;
        Ok(Self { domain, kind, name })
    }
}

pub async fn list(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    Query(query): Query<ArtifactQuery>,
) -> ApiResult<ArtifactListing> {
    let domain = required("domain", query.domain)?;
    blocking(move || Catalog::new(state.ports).list_artifacts(&start, &domain)).await
}

pub async fn detail(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    Query(query): Query<ArtifactQuery>,
) -> ApiResult<ArtifactDetail> {
    let item = ArtifactRef::try_from(query)?;
    blocking(move || {
        Catalog::new(state.ports).artifact_detail(&start, &item.domain, item.kind, &item.name)
    })
    .await
}

pub async fn source(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    Query(query): Query<ArtifactQuery>,
) -> ApiResult<ArtifactSource> {
    let item = ArtifactRef::try_from(query)?;
    blocking(move || {
        Catalog::new(state.ports).artifact_source(&start, &item.domain, item.kind, &item.name)
    })
    .await
}

pub async fn delete(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    ApiJson(query): ApiJson<ArtifactQuery>,
) -> ApiResult<DeleteResult> {
    let item = ArtifactRef::try_from(query)?;
    blocking(move || {
        Catalog::new(state.ports).delete_artifact(&start, &item.domain, item.kind, &item.name)
    })
    .await
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub domain: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub new_name: String,
    #[serde(default)]
    pub force: bool,
}

pub async fn rename(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    ApiJson(req): ApiJson<RenameRequest>,
) -> ApiResult<GenerationResult> {
    let kind = parse_kind(&req.kind)?;
    blocking(move || {
        Catalog::new(state.ports).rename_artifact(
            &start,
            &req.domain,
            kind,
            &req.name,
            &req.new_name,
            req.force,
        )
    })
    .await
}
