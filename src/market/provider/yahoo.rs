//! Yahoo Finance provider.
//!
//! Quotes come from the quoteSummary API, which needs a cookie/crumb pair;
//! history comes from the v8 chart API, which does not.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use urlencoding::encode;

use super::models::{raw, ChartResponse, QuoteSummaryResponse};
use super::{ProviderBar, ProviderError, ProviderQuote, QuoteProvider};

const PROVIDER_ID: &str = "YAHOO";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Clone)]
struct Crumb {
    cookie: String,
    crumb: String,
}

pub struct YahooProvider {
    client: Client,
    base_url: String,
    cookie_url: String,
    crumb: RwLock<Option<Crumb>>,
}

impl YahooProvider {
    pub fn new(
        base_url: impl Into<String>,
        cookie_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProviderError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            cookie_url: cookie_url.into(),
            crumb: RwLock::new(None),
        })
    }

    async fn ensure_crumb(&self) -> Result<Crumb, ProviderError> {
        if let Some(crumb) = self.crumb.read().await.as_ref() {
            return Ok(crumb.clone());
        }

        let fresh = self.fetch_crumb().await?;
        *self.crumb.write().await = Some(fresh.clone());
        Ok(fresh)
    }

    async fn fetch_crumb(&self) -> Result<Crumb, ProviderError> {
        debug!("Fetching Yahoo cookie and crumb");

        // The cookie endpoint answers 404 but still sets the cookie we need.
        let response = self
            .client
            .get(&self.cookie_url)
            .send()
            .await
            .map_err(request_error)?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split(';').next())
            .map(str::to_string)
            .ok_or_else(|| auth_error("no cookie in response"))?;

        let response = self
            .client
            .get(format!("{}/v1/test/getcrumb", self.base_url))
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(auth_error(&format!("crumb request returned {}", response.status())));
        }

        let crumb = response.text().await.map_err(request_error)?;
        let crumb = crumb.trim().to_string();
        if crumb.is_empty() {
            return Err(auth_error("empty crumb"));
        }

        Ok(Crumb { cookie, crumb })
    }

    async fn clear_crumb(&self) {
        *self.crumb.write().await = None;
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn quote(&self, symbol: &str) -> Result<Option<ProviderQuote>, ProviderError> {
        let crumb = self.ensure_crumb().await?;
        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, encode(symbol));

        let response = self
            .client
            .get(&url)
            .query(&[("modules", "price"), ("crumb", crumb.crumb.as_str())])
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(request_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            StatusCode::UNAUTHORIZED => {
                warn!("Yahoo rejected crumb, clearing it");
                self.clear_crumb().await;
                return Err(auth_error("crumb expired"));
            }
            status if !status.is_success() => return Err(status_error(status)),
            _ => {}
        }

        let body: QuoteSummaryResponse = response.json().await.map_err(decode_error)?;
        Ok(quote_from_summary(body))
    }

    async fn history(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<Vec<ProviderBar>, ProviderError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, encode(symbol));

        let response = self
            .client
            .get(&url)
            .query(&[("range", period), ("interval", interval)])
            .send()
            .await
            .map_err(request_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(Vec::new()),
            status if !status.is_success() => return Err(status_error(status)),
            _ => {}
        }

        let body: ChartResponse = response.json().await.map_err(decode_error)?;
        Ok(bars_from_chart(body))
    }
}

fn quote_from_summary(body: QuoteSummaryResponse) -> Option<ProviderQuote> {
    let price = body.quote_summary.result?.into_iter().next()?.price?;

    Some(ProviderQuote {
        price: raw(&price.regular_market_price),
        day_high: raw(&price.regular_market_day_high),
        day_low: raw(&price.regular_market_day_low),
        previous_close: raw(&price.regular_market_previous_close),
        market_cap: raw(&price.market_cap).map(|cap| cap as i64),
    })
}

/// Zips the chart's column arrays into bars, skipping intervals with a
/// missing price. Missing volume counts as zero.
fn bars_from_chart(body: ChartResponse) -> Vec<ProviderBar> {
    let Some(result) = body.chart.result.and_then(|r| r.into_iter().next()) else {
        return Vec::new();
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    fn at(column: &[Option<f64>], i: usize) -> Option<f64> {
        column.get(i).copied().flatten()
    }

    result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &timestamp)| {
            Some(ProviderBar {
                timestamp,
                open: at(&quote.open, i)?,
                high: at(&quote.high, i)?,
                low: at(&quote.low, i)?,
                close: at(&quote.close, i)?,
                volume: at(&quote.volume, i).unwrap_or(0.0),
            })
        })
        .collect()
}

fn request_error(err: reqwest::Error) -> ProviderError {
    ProviderError::Request {
        provider: PROVIDER_ID.to_string(),
        message: err.to_string(),
    }
}

fn decode_error(err: reqwest::Error) -> ProviderError {
    ProviderError::Decode {
        provider: PROVIDER_ID.to_string(),
        message: err.to_string(),
    }
}

fn status_error(status: StatusCode) -> ProviderError {
    ProviderError::Status {
        provider: PROVIDER_ID.to_string(),
        status: status.as_u16(),
    }
}

fn auth_error(message: &str) -> ProviderError {
    ProviderError::Auth {
        provider: PROVIDER_ID.to_string(),
        message: message.to_string(),
    }
}
