//! Error handling for the HTTP and CLI surfaces

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request body was not valid JSON for the expected shape
    #[error("{0}")]
    MalformedBody(String),

    /// Input text yielded nothing usable
    #[error("{0}")]
    Unprocessable(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::MalformedBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for ServiceError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        ServiceError::MalformedBody(rejection.body_text())
    }
}
