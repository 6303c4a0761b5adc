pub mod caching;
pub mod open_er_api;

use crate::core::config::AppConfig;
use crate::core::rates::RateProvider;
use anyhow::{Context, Result};
use caching::CachingRateProvider;
use open_er_api::OpenErApiProvider;
use std::sync::Arc;
use tracing::debug;

/// Builds the rate provider described by `config`, wrapped in a cache when
/// caching is enabled.
pub fn rate_provider(config: &AppConfig) -> Result<Arc<dyn RateProvider>> {
    let upstream = OpenErApiProvider::from_config(&config.provider)
        .context("Failed to create rate provider client")?;

    if config.rates.cache {
        debug!(ttl = ?config.rates.cache_ttl(), "Caching rate table in memory");
        Ok(Arc::new(CachingRateProvider::new(
            upstream,
            config.rates.cache_ttl(),
        )))
    } else {
        debug!("Fetching rates per request");
        Ok(Arc::new(upstream))
    }
}
