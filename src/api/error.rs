use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::product::UnknownPlatform;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid platform")]
    InvalidPlatform(#[from] UnknownPlatform),
}

/// Body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidPlatform(_) => StatusCode::BAD_REQUEST,
        };

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
