//! Yahoo Finance API response models.
//!
//! Only the fields the gateway reads are modelled; everything else in the
//! payloads is ignored by serde.

use serde::Deserialize;

/// Response wrapper for the quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResponse {
    pub quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSummary {
    #[serde(default)]
    pub result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSummaryResult {
    pub price: Option<PriceModule>,
}

/// `price` module of quoteSummary
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceModule {
    pub regular_market_price: Option<RawValue>,
    pub regular_market_day_high: Option<RawValue>,
    pub regular_market_day_low: Option<RawValue>,
    pub regular_market_previous_close: Option<RawValue>,
    pub market_cap: Option<RawValue>,
}

/// Yahoo wraps numbers as `{"raw": 1.0, "fmt": "1.00"}`, or `{}` when the
/// value is unknown.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct RawValue {
    pub raw: Option<f64>,
}

pub fn raw(value: &Option<RawValue>) -> Option<f64> {
    value.and_then(|v| v.raw)
}

/// Response wrapper for the v8 chart API
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
}

/// Column-oriented OHLCV arrays; entries are `null` for empty intervals.
#[derive(Debug, Deserialize, Default)]
pub struct ChartQuote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}
