use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::market::cache::QuoteCache;
use crate::market::model::{OhlcvRecord, QuoteRecord};
use crate::market::provider::{ProviderError, QuoteProvider, YahooProvider};

#[derive(Clone)]
pub struct MarketService {
    provider: Arc<dyn QuoteProvider>,
    cache: Arc<QuoteCache>,
    fanout_workers: usize,
}

impl MarketService {
    pub fn new(provider: Arc<dyn QuoteProvider>, cache: QuoteCache, fanout_workers: usize) -> Self {
        Self {
            provider,
            cache: Arc::new(cache),
            fanout_workers: fanout_workers.max(1),
        }
    }

    /// Builds the production service backed by Yahoo Finance.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let provider = YahooProvider::new(
            config.yahoo_base_url.clone(),
            config.yahoo_cookie_url.clone(),
            config.provider_timeout,
        )
        .map_err(|e| AppError::ConfigError(e.to_string()))?;

        Ok(Self::new(
            Arc::new(provider),
            QuoteCache::new(config.cache_ttl, config.cache_capacity),
            config.fanout_workers,
        ))
    }

    pub fn cache(&self) -> &QuoteCache {
        &self.cache
    }

    /// Looks `symbol` up at the provider, bypassing the cache. Never fails:
    /// missing data and provider errors come back as error records.
    pub async fn fetch(&self, symbol: &str) -> QuoteRecord {
        match self.provider.quote(symbol).await {
            Ok(Some(quote)) if quote.price.is_some() => {
                debug!(symbol, provider = self.provider.id(), "Fetched quote");
                QuoteRecord::success(symbol, quote, Utc::now().timestamp())
            }
            Ok(_) => {
                debug!(symbol, provider = self.provider.id(), "Provider has no price");
                QuoteRecord::no_data(symbol)
            }
            Err(e) => {
                warn!(symbol, provider = self.provider.id(), error = %e, "Quote lookup failed");
                QuoteRecord::failure(symbol, e.to_string())
            }
        }
    }

    /// Cached lookup keyed by `symbol` exactly as given. Error records are
    /// cached too. Concurrent misses on the same key may each call the
    /// provider; the last one to finish wins the slot.
    pub async fn get_or_fetch(&self, symbol: &str) -> QuoteRecord {
        if let Some(record) = self.cache.get(symbol).await {
            debug!(symbol, "Quote cache hit");
            return record;
        }

        let record = self.fetch(symbol).await;
        self.cache.insert(symbol, record.clone()).await;
        record
    }

    /// Resolves every symbol with at most `fanout_workers` lookups in flight.
    /// `result[i]` always belongs to `symbols[i]`.
    pub async fn get_many(&self, symbols: &[String]) -> Vec<QuoteRecord> {
        stream::iter(symbols.iter().cloned())
            .map(|symbol| async move { self.get_or_fetch(&symbol).await })
            .buffered(self.fanout_workers)
            .collect()
            .await
    }

    /// Price history for `symbol`, mapped to rounded OHLCV records in
    /// provider order. An empty series is a `NotFound`.
    pub async fn history(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<Vec<OhlcvRecord>, AppError> {
        let bars = self
            .provider
            .history(symbol, period, interval)
            .await
            .map_err(|e: ProviderError| {
                warn!(symbol, period, interval, error = %e, "History lookup failed");
                AppError::from(e)
            })?;

        if bars.is_empty() {
            return Err(AppError::not_found(format!(
                "No historical data found for '{}'",
                symbol
            )));
        }

        Ok(bars.into_iter().map(OhlcvRecord::from).collect())
    }
}
