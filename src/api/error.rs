use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("--{field} {message}")]
    InvalidParameter { field: &'static str, message: String },

    #[error("Invalid request payload: {0}")]
    InvalidPayload(String),

    #[error("Not found")]
    NotFound,

    #[error("Failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}

impl ApiError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ApiError::InvalidParameter {
            field,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidParameter { .. } | ApiError::InvalidPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidPayload(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidPayload(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::warn!(%status, error = %self, "request rejected");
        }
        super::json_response(
            status,
            ErrorResponse {
                error: self.to_string(),
            },
        )
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
