//! Error taxonomy for conversions

use thiserror::Error;

/// Client-supplied input that cannot be converted. Surfaced as `400`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please provide amount, from, and to in request body.")]
    MissingField,
    #[error("Amount must be a finite number.")]
    InvalidAmount,
    #[error("Currency code '{0}' not supported.")]
    UnsupportedCurrency(String),
    #[error("Request body must be a JSON object with amount, from, and to.")]
    MalformedBody,
}

/// Failure talking to the rate provider. Surfaced as `500`.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Rate request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("Rate request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("Rate provider returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("Rate provider reported an error: {0}")]
    Provider(String),
    #[error("Malformed rate payload: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout(err)
        } else {
            UpstreamError::Request(err)
        }
    }
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to fetch rates or convert currency.")]
    Upstream(#[from] UpstreamError),
}
