//! Upstream market-data provider seam.
//!
//! The gateway only needs two things from a provider: a quote snapshot for a
//! symbol and an OHLCV series for a symbol/period/interval triple. Anything
//! implementing [`QuoteProvider`] can back the service; production uses
//! [`YahooProvider`].

mod models;
mod yahoo;

pub use yahoo::YahooProvider;

use async_trait::async_trait;
use thiserror::Error;

/// Failures raised by a provider call itself.
///
/// "No data" is not an error at this level: `quote` returns `Ok(None)` and
/// `history` returns an empty series.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request to {provider} failed: {message}")]
    Request { provider: String, message: String },

    #[error("{provider} returned HTTP {status}")]
    Status { provider: String, status: u16 },

    #[error("Failed to decode {provider} response: {message}")]
    Decode { provider: String, message: String },

    #[error("{provider} authentication failed: {message}")]
    Auth { provider: String, message: String },

    #[error("{0}")]
    Other(String),
}

/// Raw quote fields as reported by the provider. Any subset may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderQuote {
    pub price: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub previous_close: Option<f64>,
    pub market_cap: Option<i64>,
}

/// One interval of a provider time series.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderBar {
    /// Unix seconds at the start of the interval.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Short identifier used in logs.
    fn id(&self) -> &'static str;

    /// Latest quote snapshot, or `None` when the provider knows nothing
    /// about `symbol`.
    async fn quote(&self, symbol: &str) -> Result<Option<ProviderQuote>, ProviderError>;

    /// Historical bars ordered by timestamp ascending. `period` and
    /// `interval` are passed through to the provider untouched.
    async fn history(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<Vec<ProviderBar>, ProviderError>;
}
