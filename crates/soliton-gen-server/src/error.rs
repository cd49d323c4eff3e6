//! HTTP error mapping.
//!
//! Every failure leaves the server as `{"error": "<message>"}`.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use soliton_gen_core::error::{ErrorCategory, GenError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Gen(#[from] GenError),

    #[error("{0}")]
    BadRequest(String),

    #[error("background task failed: {0}")]
    Task(String),
}

pub type ApiResult<T> = Result<Json<T>, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Gen(err) => match err.category() {
                ErrorCategory::Validation => StatusCode::BAD_REQUEST,
                ErrorCategory::NotFound => StatusCode::NOT_FOUND,
                ErrorCategory::Configuration | ErrorCategory::Internal => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soliton_gen_core::application::ApplicationError;
    use soliton_gen_core::domain::DomainError;

    #[test]
    fn categories_map_to_statuses() {
        let validation = ServerError::from(GenError::from(DomainError::MissingName {
            what: "domain name",
        }));
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let missing = ServerError::from(GenError::not_found("domain order"));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let io = ServerError::from(GenError::from(ApplicationError::FilesystemError {
            path: "/x".into(),
            reason: "denied".into(),
        }));
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
