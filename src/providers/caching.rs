use crate::core::error::UpstreamError;
use crate::core::rates::{RateProvider, RateTable};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

struct CachedTable {
    table: RateTable,
    fetched_at: Instant,
}

/// Keeps the last successfully fetched rate table.
///
/// Without a TTL the table lives as long as the provider. Failures are never
/// cached. The lock is not held across the inner fetch, so concurrent misses
/// each fetch and the last one to finish wins.
pub struct CachingRateProvider<T: RateProvider> {
    inner: T,
    ttl: Option<Duration>,
    cached: RwLock<Option<CachedTable>>,
}

impl<T: RateProvider> CachingRateProvider<T> {
    pub fn new(inner: T, ttl: Option<Duration>) -> Self {
        Self {
            inner,
            ttl,
            cached: RwLock::new(None),
        }
    }

    /// Drops the cached table so the next call goes upstream.
    pub async fn invalidate(&self) {
        debug!("Rate cache INVALIDATE");
        *self.cached.write().await = None;
    }

    fn is_fresh(&self, entry: &CachedTable) -> bool {
        self.ttl.is_none_or(|ttl| entry.fetched_at.elapsed() < ttl)
    }
}

#[async_trait]
impl<T: RateProvider> RateProvider for CachingRateProvider<T> {
    async fn fetch_rates(&self) -> Result<RateTable, UpstreamError> {
        let expired = {
            let cached = self.cached.read().await;
            match cached.as_ref() {
                Some(entry) if self.is_fresh(entry) => {
                    debug!("Rate cache HIT");
                    return Ok(entry.table.clone());
                }
                Some(_) => true,
                None => false,
            }
        };

        // An expired table must not outlive a failed refresh.
        if expired {
            self.invalidate().await;
        }

        debug!("Rate cache MISS");
        let table = self.inner.fetch_rates().await?;

        *self.cached.write().await = Some(CachedTable {
            table: table.clone(),
            fetched_at: Instant::now(),
        });
        debug!("Rate cache PUT");
        Ok(table)
    }
}
