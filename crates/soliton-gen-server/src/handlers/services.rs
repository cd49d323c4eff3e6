use axum::extract::{MatchedPath, Path, State};
use serde::Serialize;
use soliton_gen_core::application::{Catalog, ServiceGenerator};
use soliton_gen_core::domain::{
    DeleteResult, GenerationResult, ServiceConfig, ServiceDetection, ServiceInfo,
};

use super::{blocking, is_preview, ApiJson};
use crate::error::ApiResult;
use crate::state::{AppState, ProjectDir};

pub async fn generate(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    path: MatchedPath,
    ApiJson(cfg): ApiJson<ServiceConfig>,
) -> ApiResult<GenerationResult> {
    let preview = is_preview(&path);
    blocking(move || ServiceGenerator::new(state.ports).generate(&start, &cfg, preview)).await
}

#[derive(Debug, Serialize)]
pub struct ServiceList {
    pub services: Vec<ServiceInfo>,
}

pub async fn list(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
) -> ApiResult<ServiceList> {
    blocking(move || {
        let services = Catalog::new(state.ports).list_services(&start)?;
        Ok(ServiceList { services })
    })
    .await
}

pub async fn detect(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    Path(name): Path<String>,
) -> ApiResult<ServiceDetection> {
    blocking(move || ServiceGenerator::new(state.ports).detect(&start, &name)).await
}

pub async fn detail(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    Path(name): Path<String>,
) -> ApiResult<ServiceInfo> {
    blocking(move || Catalog::new(state.ports).service_detail(&start, &name)).await
}

pub async fn delete(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    Path(name): Path<String>,
) -> ApiResult<DeleteResult> {
    blocking(move || Catalog::new(state.ports).delete_service(&start, &name)).await
}
