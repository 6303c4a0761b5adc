//! Terminal counterpart of the conversion form.

use crate::cli::ui::{StyleType, format_amount, new_spinner, style_text};
use crate::core::conversion::{ConversionRequest, ConversionResult, Converter};
use crate::core::currency::DisplayCurrency;
use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const INVALID_AMOUNT_MESSAGE: &str = "Please enter a valid amount";

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionForm {
    pub amount: String,
    pub from: DisplayCurrency,
    pub to: DisplayCurrency,
}

impl Default for ConversionForm {
    fn default() -> Self {
        ConversionForm {
            amount: String::new(),
            from: DisplayCurrency::Inr,
            to: DisplayCurrency::Pkr,
        }
    }
}

impl ConversionForm {
    /// Checks the entered amount and builds the request sent to the converter.
    pub fn to_request(&self) -> Result<ConversionRequest> {
        let amount = self
            .amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite())
            .ok_or_else(|| anyhow!(INVALID_AMOUNT_MESSAGE))?;
        Ok(ConversionRequest::new(
            amount,
            self.from.code(),
            self.to.code(),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ServerReply {
    error: Option<String>,
}

/// Where the form sends its requests.
pub enum FormBackend {
    /// Converts in-process with the shared converter.
    Local(Converter),
    /// Posts to a running backend's `/convert`.
    Remote {
        base_url: String,
        client: reqwest::Client,
    },
}

impl FormBackend {
    pub fn remote(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fxconv/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(FormBackend::Remote {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Submits the request. Error messages are suitable for showing verbatim.
    pub async fn submit(&self, request: &ConversionRequest) -> Result<ConversionResult> {
        match self {
            FormBackend::Local(converter) => Ok(converter.convert(request).await?),
            FormBackend::Remote { base_url, client } => {
                let url = format!("{base_url}/convert");
                debug!("Posting conversion to {}", url);

                let response = client
                    .post(&url)
                    .json(request)
                    .send()
                    .await
                    .map_err(|e| anyhow!("Something went wrong: {e}"))?;
                let status = response.status();
                let body = response
                    .text()
                    .await
                    .map_err(|e| anyhow!("Something went wrong: {e}"))?;

                if !status.is_success() {
                    let message = serde_json::from_str::<ServerReply>(&body)
                        .ok()
                        .and_then(|reply| reply.error)
                        .unwrap_or_else(|| "Server error".to_string());
                    return Err(anyhow!(message));
                }

                serde_json::from_str::<ConversionResult>(&body)
                    .map_err(|_| anyhow!("Conversion failed. Try again."))
            }
        }
    }
}

pub fn render_result(result: &ConversionResult) -> String {
    format!(
        "{} {} = {}",
        format_amount(result.amount),
        result.from,
        style_text(
            &format!("{} {}", format_amount(result.converted_amount), result.to),
            StyleType::Value
        )
    )
}

pub async fn run(form: &ConversionForm, backend: &FormBackend) -> Result<()> {
    let request = form.to_request()?;

    let spinner = new_spinner("Converting...");
    let outcome = backend.submit(&request).await;
    spinner.finish_and_clear();

    let result = outcome?;
    println!("{}", render_result(&result));
    Ok(())
}
