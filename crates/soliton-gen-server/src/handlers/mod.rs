//! Route handlers, grouped by resource.

pub mod ddd;
pub mod domains;
pub mod meta;
pub mod projects;
pub mod services;

use axum::{extract::FromRequest, extract::MatchedPath, Json};
use soliton_gen_core::error::GenResult;

use crate::error::ServerError;

/// `Json` whose rejections render as `{"error": ...}`.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ServerError))]
pub struct ApiJson<T>(pub T);

/// The `/preview` twin of a route runs the same pipeline without writing.
pub(crate) fn is_preview(path: &MatchedPath) -> bool {
    path.as_str().ends_with("/preview")
}

/// Runs a synchronous core operation off the async executor.
pub(crate) async fn blocking<T, F>(job: F) -> Result<Json<T>, ServerError>
where
    F: FnOnce() -> GenResult<T> + Send + 'static,
    T: Send + 'static,
{
    let value = tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| ServerError::Task(e.to_string()))??;
    Ok(Json(value))
}

pub(crate) fn required(name: &str, value: Option<String>) -> Result<String, ServerError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ServerError::BadRequest(format!("{name} is required"))),
    }
}
