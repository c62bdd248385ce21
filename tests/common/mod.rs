#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use stock_gateway::{
    api::router::router_with_service,
    market::{
        cache::QuoteCache,
        provider::{ProviderBar, ProviderError, ProviderQuote, QuoteProvider},
    },
    MarketService,
};

/// In-memory provider. Symbols are matched case-insensitively, like Yahoo.
#[derive(Default)]
pub struct MockProvider {
    quotes: HashMap<String, ProviderQuote>,
    failures: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    bars: HashMap<String, Vec<ProviderBar>>,
    history_failure: Option<String>,
    pub quote_calls: AtomicUsize,
    pub history_requests: Mutex<Vec<(String, String, String)>>,
    pub completed: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(mut self, symbol: &str, quote: ProviderQuote) -> Self {
        self.quotes.insert(symbol.to_uppercase(), quote);
        self
    }

    pub fn with_price(self, symbol: &str, price: f64) -> Self {
        self.with_quote(
            symbol,
            ProviderQuote {
                price: Some(price),
                ..Default::default()
            },
        )
    }

    pub fn with_failure(mut self, symbol: &str, message: &str) -> Self {
        self.failures.insert(symbol.to_uppercase(), message.to_string());
        self
    }

    pub fn with_delay(mut self, symbol: &str, delay: Duration) -> Self {
        self.delays.insert(symbol.to_uppercase(), delay);
        self
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<ProviderBar>) -> Self {
        self.bars.insert(symbol.to_uppercase(), bars);
        self
    }

    pub fn with_history_failure(mut self, message: &str) -> Self {
        self.history_failure = Some(message.to_string());
        self
    }

    pub fn quote_calls(&self) -> usize {
        self.quote_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteProvider for MockProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn quote(&self, symbol: &str) -> Result<Option<ProviderQuote>, ProviderError> {
        let key = symbol.to_uppercase();
        self.quote_calls.fetch_add(1, Ordering::SeqCst);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.get(&key).copied().unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.lock().unwrap().push(key.clone());

        if let Some(message) = self.failures.get(&key) {
            return Err(ProviderError::Other(message.clone()));
        }
        Ok(self.quotes.get(&key).cloned())
    }

    async fn history(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<Vec<ProviderBar>, ProviderError> {
        self.history_requests.lock().unwrap().push((
            symbol.to_string(),
            period.to_string(),
            interval.to_string(),
        ));

        if let Some(message) = &self.history_failure {
            return Err(ProviderError::Other(message.clone()));
        }
        Ok(self
            .bars
            .get(&symbol.to_uppercase())
            .cloned()
            .unwrap_or_default())
    }
}

pub fn build_app(provider: MockProvider) -> (Router, Arc<MockProvider>) {
    build_app_with_workers(provider, 10)
}

pub fn build_app_with_workers(provider: MockProvider, workers: usize) -> (Router, Arc<MockProvider>) {
    let provider = Arc::new(provider);
    let service = MarketService::new(
        provider.clone(),
        QuoteCache::new(Duration::from_secs(300), 512),
        workers,
    );
    (router_with_service(service), provider)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
