use axum::{
    extract::{MatchedPath, Path, State},
    Json,
};
use serde::Serialize;
use soliton_gen_core::application::{Catalog, DomainGenerator};
use soliton_gen_core::domain::{
    DeleteResult, DomainConfig, DomainDetail, DomainSummary, FieldType, GenerationResult,
};

use super::{blocking, is_preview, ApiJson};
use crate::error::ApiResult;
use crate::state::{AppState, ProjectDir};

pub async fn generate(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    path: MatchedPath,
    ApiJson(cfg): ApiJson<DomainConfig>,
) -> ApiResult<GenerationResult> {
    let preview = is_preview(&path);
    blocking(move || DomainGenerator::new(state.ports).generate(&start, &cfg, preview)).await
}

#[derive(Debug, Serialize)]
pub struct DomainList {
    pub domains: Vec<DomainSummary>,
}

pub async fn list(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
) -> ApiResult<DomainList> {
    blocking(move || {
        let domains = Catalog::new(state.ports).list_domains(&start)?;
        Ok(DomainList { domains })
    })
    .await
}

pub async fn detail(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    Path(name): Path<String>,
) -> ApiResult<DomainDetail> {
    blocking(move || Catalog::new(state.ports).domain_detail(&start, &name)).await
}

pub async fn delete(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
    Path(name): Path<String>,
) -> ApiResult<DeleteResult> {
    blocking(move || Catalog::new(state.ports).delete_domain(&start, &name)).await
}

#[derive(Debug, Serialize)]
pub struct FieldTypeInfo {
    #[serde(rename = "type")]
    pub type_name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FieldTypes {
    pub types: Vec<FieldTypeInfo>,
}

pub async fn field_types() -> Json<FieldTypes> {
    let types = FieldType::ALL
        .iter()
        .map(|t| FieldTypeInfo {
            type_name: t.as_str(),
            description: t.description(),
        })
        .collect();
    Json(FieldTypes { types })
}
