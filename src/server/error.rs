use crate::core::error::ConvertError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorResponse {
            error: message.into(),
        }
    }
}

impl ConvertError {
    pub fn status(&self) -> StatusCode {
        match self {
            ConvertError::Validation(_) => StatusCode::BAD_REQUEST,
            ConvertError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ConvertError {
    fn into_response(self) -> Response {
        match &self {
            ConvertError::Validation(e) => debug!(error = %e, "Rejected conversion request"),
            // The cause stays in the log; clients only see the generic message.
            ConvertError::Upstream(e) => error!(error = %e, "Failed to fetch rates"),
        }
        (self.status(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
