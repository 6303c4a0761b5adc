use crate::core::conversion::{ConversionRequest, ConversionResult};
use crate::core::error::{ConvertError, ValidationError};
use crate::server::AppState;
use crate::server::error::ErrorResponse;
use axum::extract::rejection::JsonRejection;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::debug;

pub const HEALTH_MESSAGE: &str = "Backend is working!";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed, use POST.";

pub async fn health() -> &'static str {
    HEALTH_MESSAGE
}

pub async fn convert(
    State(state): State<AppState>,
    payload: Result<Json<ConversionRequest>, JsonRejection>,
) -> Result<Json<ConversionResult>, ConvertError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(%rejection, "Could not read conversion body");
        ValidationError::MalformedBody
    })?;

    let result = state.converter.convert(&request).await?;
    Ok(Json(result))
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new(METHOD_NOT_ALLOWED_MESSAGE)),
    )
}
