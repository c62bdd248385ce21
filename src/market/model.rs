use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::market::provider::{ProviderBar, ProviderQuote};

/// Normalized quote lookup result.
///
/// A success record carries the price fields and `timestamp`; a failed
/// lookup carries only `symbol` and `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QuoteRecord {
    pub fn success(symbol: &str, quote: ProviderQuote, timestamp: i64) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            price: quote.price,
            day_high: quote.day_high,
            day_low: quote.day_low,
            previous_close: quote.previous_close,
            market_cap: quote.market_cap,
            timestamp: Some(timestamp),
            error: None,
        }
    }

    pub fn failure(symbol: &str, error: impl Into<String>) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            price: None,
            day_high: None,
            day_low: None,
            previous_close: None,
            market_cap: None,
            timestamp: None,
            error: Some(error.into()),
        }
    }

    pub fn no_data(symbol: &str) -> Self {
        Self::failure(symbol, format!("No data found for '{}'", symbol))
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Deserialize)]
pub struct StockQuery {
    pub symbol: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct BatchQuoteRequest {
    #[validate(length(min = 1, message = "symbols must not be empty"))]
    pub symbols: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub symbol: Option<String>,
    pub interval: Option<String>,
    pub period: Option<String>,
}

/// One interval of price history, prices rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvRecord {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl From<ProviderBar> for OhlcvRecord {
    fn from(bar: ProviderBar) -> Self {
        let date = chrono::DateTime::from_timestamp(bar.timestamp, 0)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| bar.timestamp.to_string());

        Self {
            date,
            open: round2(bar.open),
            high: round2(bar.high),
            low: round2(bar.low),
            close: round2(bar.close),
            volume: bar.volume as i64,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub symbol: String,
    pub interval: String,
    pub period: String,
    pub data: Vec<OhlcvRecord>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
