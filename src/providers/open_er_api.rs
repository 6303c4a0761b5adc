use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::config::ProviderConfig;
use crate::core::error::UpstreamError;
use crate::core::rates::{PIVOT_CURRENCY, RateProvider, RateTable};

/// Fetches USD-relative rates from an open.er-api.com compatible endpoint.
///
/// Each call makes exactly one request; there is no retry.
pub struct OpenErApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OpenErApiProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fxconv/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(OpenErApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, UpstreamError> {
        Self::new(&config.base_url, config.timeout())
    }

    fn rates_url(&self) -> String {
        format!("{}/v6/latest/{}", self.base_url, PIVOT_CURRENCY)
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    rates: Option<HashMap<String, f64>>,
}

#[async_trait]
impl RateProvider for OpenErApiProvider {
    #[instrument(name = "OpenErApiFetch", skip(self))]
    async fn fetch_rates(&self) -> Result<RateTable, UpstreamError> {
        let url = self.rates_url();
        debug!("Requesting rates from {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(UpstreamError::Status(response.status()));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| UpstreamError::Malformed(format!("invalid JSON: {e}")))?;

        if data.result.as_deref() == Some("error") {
            return Err(UpstreamError::Provider(
                data.error_type.unwrap_or_else(|| "unknown".to_string()),
            ));
        }

        let rates = data
            .rates
            .ok_or_else(|| UpstreamError::Malformed("missing rates field".to_string()))?;

        let table = RateTable::new(rates);
        debug!("Fetched {} rates", table.len());
        Ok(table)
    }
}
