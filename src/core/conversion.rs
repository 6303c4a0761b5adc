//! Request validation and USD-pivoted conversion

use crate::core::error::{ConvertError, ValidationError};
use crate::core::rates::{RateProvider, RateTable};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// An amount as submitted by a client: a JSON number, numeric text, or any
/// other JSON value, which never converts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl AmountInput {
    fn is_blank(&self) -> bool {
        matches!(self, AmountInput::Text(s) if s.trim().is_empty())
    }

    fn to_finite(&self) -> Option<f64> {
        let value = match self {
            AmountInput::Number(n) => *n,
            AmountInput::Text(s) => s.trim().parse::<f64>().ok()?,
            AmountInput::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    #[serde(default)]
    pub amount: Option<AmountInput>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

impl ConversionRequest {
    pub fn new(amount: impl Into<AmountInput>, from: &str, to: &str) -> Self {
        ConversionRequest {
            amount: Some(amount.into()),
            from: Some(from.to_string()),
            to: Some(to.to_string()),
        }
    }

    /// Checks presence and amount finiteness, returning the parsed amount with
    /// uppercased codes. Does not consult any rate table.
    pub fn validate(&self) -> Result<(f64, String, String), ValidationError> {
        let present = |field: &Option<String>| -> Option<String> {
            field
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let amount = self
            .amount
            .as_ref()
            .filter(|a| !a.is_blank())
            .ok_or(ValidationError::MissingField)?;
        let from = present(&self.from).ok_or(ValidationError::MissingField)?;
        let to = present(&self.to).ok_or(ValidationError::MissingField)?;

        let amount = amount.to_finite().ok_or(ValidationError::InvalidAmount)?;

        Ok((amount, from.to_uppercase(), to.to_uppercase()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub converted_amount: f64,
}

/// Converts `amount` of `from` into `to` through the USD pivot.
///
/// Codes must already be normalized. The result carries full precision; an
/// amount whose converted value overflows is rejected as invalid.
pub fn convert_with_rates(
    amount: f64,
    from: &str,
    to: &str,
    rates: &RateTable,
) -> Result<f64, ValidationError> {
    let from_rate = rates
        .rate(from)
        .ok_or_else(|| ValidationError::UnsupportedCurrency(from.to_string()))?;
    let to_rate = rates
        .rate(to)
        .ok_or_else(|| ValidationError::UnsupportedCurrency(to.to_string()))?;

    let amount_in_usd = amount / from_rate;
    let converted = amount_in_usd * to_rate;
    if !converted.is_finite() {
        debug!("Conversion of {} {} to {} overflowed", amount, from, to);
        return Err(ValidationError::InvalidAmount);
    }
    Ok(converted)
}

/// Validates requests and converts them against freshly provided rates.
#[derive(Clone)]
pub struct Converter {
    provider: Arc<dyn RateProvider>,
}

impl Converter {
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Converter { provider }
    }

    #[instrument(name = "Convert", skip(self, request), fields(from = ?request.from, to = ?request.to))]
    pub async fn convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionResult, ConvertError> {
        let (amount, from, to) = request.validate()?;

        let rates = self.provider.fetch_rates().await?;
        debug!("Converting with {} rates", rates.len());

        let converted_amount = convert_with_rates(amount, &from, &to, &rates)?;

        Ok(ConversionResult {
            amount,
            from,
            to,
            converted_amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::UpstreamError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockRateProvider {
        rates: Option<HashMap<String, f64>>,
        call_count: AtomicUsize,
    }

    impl MockRateProvider {
        fn with_rates(rates: &[(&str, f64)]) -> Arc<Self> {
            Arc::new(Self {
                rates: Some(
                    rates
                        .iter()
                        .map(|(code, rate)| (code.to_string(), *rate))
                        .collect(),
                ),
                call_count: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                rates: None,
                call_count: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl RateProvider for MockRateProvider {
        async fn fetch_rates(&self) -> Result<RateTable, UpstreamError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            match &self.rates {
                Some(rates) => Ok(RateTable::new(rates.clone())),
                None => Err(UpstreamError::Provider("simulated outage".to_string())),
            }
        }
    }

    fn sample_rates() -> RateTable {
        RateTable::new(HashMap::from([
            ("USD".to_string(), 1.0),
            ("EUR".to_string(), 0.92),
            ("INR".to_string(), 83.0),
            ("PKR".to_string(), 278.0),
            ("JPY".to_string(), 151.7),
        ]))
    }

    fn sample_codes() -> [&'static str; 5] {
        ["USD", "EUR", "INR", "PKR", "JPY"]
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[tokio::test]
    async fn test_inr_to_pkr_example() {
        let provider = MockRateProvider::with_rates(&[("INR", 83.0), ("PKR", 278.0)]);
        let converter = Converter::new(provider.clone());

        let result = converter
            .convert(&ConversionRequest::new(100.0, "inr", "pkr"))
            .await
            .unwrap();

        assert_eq!(result.amount, 100.0);
        assert_eq!(result.from, "INR");
        assert_eq!(result.to, "PKR");
        assert!((result.converted_amount - 334.94).abs() < 0.01);
        assert!(approx_eq(result.converted_amount, 100.0 / 83.0 * 278.0));
        assert_eq!(provider.call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_amount_is_valid() {
        let converter = Converter::new(MockRateProvider::with_rates(&[
            ("USD", 1.0),
            ("EUR", 0.92),
        ]));

        let result = converter
            .convert(&ConversionRequest::new(0.0, "USD", "EUR"))
            .await
            .unwrap();
        assert_eq!(result.converted_amount, 0.0);
    }

    #[tokio::test]
    async fn test_missing_fields_short_circuit_before_fetch() {
        let provider = MockRateProvider::with_rates(&[("USD", 1.0)]);
        let converter = Converter::new(provider.clone());

        let cases = [
            ConversionRequest {
                amount: None,
                ..ConversionRequest::new(1.0, "USD", "USD")
            },
            ConversionRequest {
                from: None,
                ..ConversionRequest::new(1.0, "USD", "USD")
            },
            ConversionRequest::new(1.0, "USD", "   "),
            ConversionRequest::new("", "USD", "USD"),
        ];

        for request in &cases {
            let err = converter.convert(request).await.unwrap_err();
            assert!(
                matches!(err, ConvertError::Validation(ValidationError::MissingField)),
                "unexpected error for {request:?}: {err:?}"
            );
        }
        assert_eq!(provider.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_amount() {
        let provider = MockRateProvider::with_rates(&[("USD", 1.0)]);
        let converter = Converter::new(provider.clone());

        for amount in ["abc", "12abc", "NaN", "inf"] {
            let err = converter
                .convert(&ConversionRequest::new(amount, "USD", "USD"))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                ConvertError::Validation(ValidationError::InvalidAmount)
            ));
        }
        assert_eq!(provider.call_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_field_wins_over_invalid_amount() {
        let request = ConversionRequest {
            to: None,
            ..ConversionRequest::new("abc", "USD", "EUR")
        };
        assert_eq!(request.validate(), Err(ValidationError::MissingField));
    }

    #[test]
    fn test_numeric_text_amount_is_accepted() {
        let request = ConversionRequest::new(" 42.5 ", " eur ", "gbp");
        assert_eq!(
            request.validate(),
            Ok((42.5, "EUR".to_string(), "GBP".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unsupported_currency_names_code() {
        let converter = Converter::new(MockRateProvider::with_rates(&[("USD", 1.0)]));

        let err = converter
            .convert(&ConversionRequest::new(10.0, "zzz", "USD"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Validation(ValidationError::UnsupportedCurrency(_))
        ));
        assert!(err.to_string().contains("ZZZ"));

        let err = converter
            .convert(&ConversionRequest::new(10.0, "USD", "QQQ"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Currency code 'QQQ' not supported.");
    }

    #[tokio::test]
    async fn test_from_checked_before_to() {
        let converter = Converter::new(MockRateProvider::with_rates(&[("USD", 1.0)]));
        let err = converter
            .convert(&ConversionRequest::new(10.0, "AAA", "BBB"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("AAA"));
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let provider = MockRateProvider::failing();
        let converter = Converter::new(provider.clone());

        let err = converter
            .convert(&ConversionRequest::new(10.0, "USD", "EUR"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Upstream(_)));
        assert_eq!(provider.call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_same_currency_is_identity() {
        let rates = sample_rates();
        for code in sample_codes() {
            for amount in [0.0, 1.0, 99.99, -250.5, 1e9] {
                let converted = convert_with_rates(amount, code, code, &rates).unwrap();
                assert!(approx_eq(converted, amount), "{code} {amount} -> {converted}");
            }
        }
    }

    #[test]
    fn test_conversion_is_linear_in_amount() {
        let rates = sample_rates();
        let base = convert_with_rates(12.5, "EUR", "JPY", &rates).unwrap();
        for k in [0.0, 2.0, 10.0, -3.0, 0.125] {
            let scaled = convert_with_rates(k * 12.5, "EUR", "JPY", &rates).unwrap();
            assert!(approx_eq(scaled, k * base), "k={k}");
        }
    }

    #[test]
    fn test_round_trip_returns_original_amount() {
        let rates = sample_rates();
        let codes = sample_codes();
        for a in codes {
            for b in codes {
                let there = convert_with_rates(1234.56, a, b, &rates).unwrap();
                let back = convert_with_rates(there, b, a, &rates).unwrap();
                assert!(approx_eq(back, 1234.56), "{a}->{b}->{a} gave {back}");
            }
        }
    }

    #[test]
    fn test_overflowing_conversion_is_rejected() {
        let rates = sample_rates();
        assert_eq!(
            convert_with_rates(1e308, "USD", "JPY", &rates),
            Err(ValidationError::InvalidAmount)
        );
        assert_eq!(
            convert_with_rates(-1e308, "USD", "JPY", &rates),
            Err(ValidationError::InvalidAmount)
        );
    }

    #[tokio::test]
    async fn test_overflow_yields_no_partial_result() {
        let provider = MockRateProvider::with_rates(&[("USD", 1.0), ("JPY", 151.7)]);
        let converter = Converter::new(provider.clone());

        let err = converter
            .convert(&ConversionRequest::new(1e308, "USD", "JPY"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Validation(ValidationError::InvalidAmount)
        ));
        assert_eq!(provider.call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_non_numeric_json_amount_is_invalid() {
        for body in [
            r#"{"amount": true, "from": "USD", "to": "EUR"}"#,
            r#"{"amount": [1], "from": "USD", "to": "EUR"}"#,
            r#"{"amount": {"value": 1}, "from": "USD", "to": "EUR"}"#,
        ] {
            let request: ConversionRequest = serde_json::from_str(body).unwrap();
            assert!(matches!(request.amount, Some(AmountInput::Other(_))));
            assert_eq!(request.validate(), Err(ValidationError::InvalidAmount));
        }
    }

    #[test]
    fn test_request_deserializes_number_or_text_amount() {
        let numeric: ConversionRequest =
            serde_json::from_str(r#"{"amount": 100, "from": "INR", "to": "PKR"}"#).unwrap();
        assert_eq!(numeric.amount, Some(AmountInput::Number(100.0)));

        let text: ConversionRequest =
            serde_json::from_str(r#"{"amount": "7.5", "from": "INR"}"#).unwrap();
        assert_eq!(text.amount, Some(AmountInput::Text("7.5".to_string())));
        assert_eq!(text.to, None);

        let null: ConversionRequest =
            serde_json::from_str(r#"{"amount": null, "from": "INR", "to": "PKR"}"#).unwrap();
        assert_eq!(null.validate(), Err(ValidationError::MissingField));
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = ConversionResult {
            amount: 1.0,
            from: "USD".to_string(),
            to: "EUR".to_string(),
            converted_amount: 0.92,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["convertedAmount"], 0.92);
        assert_eq!(json["from"], "USD");
    }
}
