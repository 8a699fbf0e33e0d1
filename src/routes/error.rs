// Maps analysis and catalog errors onto HTTP responses with a `{ "error": ... }` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::analysis::AnalysisError;
use crate::registry::RegistryError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Analysis(AnalysisError::InvalidInput(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Registry(RegistryError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Registry(RegistryError::Duplicate(_)) => StatusCode::CONFLICT,
            ApiError::Registry(RegistryError::InvalidInput(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        (
            status,
            axum::Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
