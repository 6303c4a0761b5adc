//! Rate table and the provider abstraction

use crate::core::error::UpstreamError;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Currency through which every conversion is mediated.
pub const PIVOT_CURRENCY: &str = "USD";

/// Units of each currency per one US dollar.
///
/// Keys are uppercase codes. Entries whose rate is not a positive finite number
/// are dropped on construction, so every lookup yields a usable divisor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn new(rates: HashMap<String, f64>) -> Self {
        rates.into_iter().collect()
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl FromIterator<(String, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let rates = iter
            .into_iter()
            .filter_map(|(code, rate)| {
                if rate.is_finite() && rate > 0.0 {
                    Some((code.to_uppercase(), rate))
                } else {
                    debug!("Dropping unusable rate {} for {}", rate, code);
                    None
                }
            })
            .collect();
        RateTable { rates }
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches a complete USD-relative rate table.
    async fn fetch_rates(&self) -> Result<RateTable, UpstreamError>;
}
