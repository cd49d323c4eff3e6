use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};
use soliton_gen_core::domain::ProjectLayout;
use soliton_gen_core::error::GenResult;

use super::blocking;
use crate::error::ApiResult;
use crate::state::{AppState, ProjectDir};

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "soliton-gen",
        "version": soliton_gen_core::VERSION,
    }))
}

#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    pub found: bool,
    #[serde(flatten)]
    pub layout: Option<ProjectLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LayoutResponse {
    /// A missing project is reported as `found: false`, not as an error.
    pub fn from_result(resolved: GenResult<ProjectLayout>) -> Self {
        match resolved {
            Ok(layout) => Self {
                found: true,
                layout: Some(layout),
                message: None,
            },
            Err(err) => Self {
                found: false,
                layout: None,
                message: Some(err.to_string()),
            },
        }
    }
}

pub async fn layout(
    State(state): State<AppState>,
    ProjectDir(start): ProjectDir,
) -> ApiResult<LayoutResponse> {
    blocking(move || {
        let resolved = state.ports.layout_resolver().resolve(&start);
        Ok(LayoutResponse::from_result(resolved))
    })
    .await
}
