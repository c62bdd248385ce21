use axum::{
  extract::{
      rejection::{JsonRejection, QueryRejection},
      Query, State,
  },
  Json,
};
use validator::Validate;

use crate::{
  error::AppError,
  market::{
      model::{BatchQuoteRequest, HistoryQuery, HistoryResponse, QuoteRecord, StockQuery},
      service::MarketService,
  },
};

pub const DEFAULT_INTERVAL: &str = "1d";
pub const DEFAULT_PERIOD: &str = "1mo";

const SYMBOL_REQUIRED: &str = "Please provide a stock symbol";
const SYMBOLS_REQUIRED: &str = "Please provide a non-empty list of symbols";

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
  query
      .map(|Query(params)| params)
      .map_err(|e| AppError::InvalidRequest(format!("Invalid query string: {}", e.body_text())))
}

fn required_symbol(symbol: Option<String>) -> Result<String, AppError> {
  symbol
      .filter(|s| !s.is_empty())
      .ok_or_else(|| AppError::MissingParameter(SYMBOL_REQUIRED.to_string()))
}

// Quote for a single symbol
pub async fn get_stock(
  State(service): State<MarketService>,
  query: Result<Query<StockQuery>, QueryRejection>,
) -> Result<Json<QuoteRecord>, AppError> {
  let query = query_params(query)?;
  let symbol = required_symbol(query.symbol)?;
  let record = service.get_or_fetch(&symbol).await;

  if let Some(message) = &record.error {
      return Err(AppError::NotFound {
          message: message.clone(),
          symbol: Some(record.symbol.clone()),
      });
  }

  Ok(Json(record))
}

// Quotes for a batch of symbols, in request order
pub async fn get_stocks(
  State(service): State<MarketService>,
  payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<Vec<QuoteRecord>>, AppError> {
  let Json(body) = payload
      .map_err(|e| AppError::InvalidRequest(format!("Invalid request body: {}", e.body_text())))?;

  let request: BatchQuoteRequest = serde_json::from_value(body)
      .map_err(|_| AppError::InvalidRequest(SYMBOLS_REQUIRED.to_string()))?;

  if request.validate().is_err() {
      return Err(AppError::InvalidRequest(SYMBOLS_REQUIRED.to_string()));
  }

  Ok(Json(service.get_many(&request.symbols).await))
}

// OHLCV history for a symbol
pub async fn get_history(
  State(service): State<MarketService>,
  query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryResponse>, AppError> {
  let query = query_params(query)?;
  let symbol = required_symbol(query.symbol)?;
  let interval = query.interval.unwrap_or_else(|| DEFAULT_INTERVAL.to_string());
  let period = query.period.unwrap_or_else(|| DEFAULT_PERIOD.to_string());

  let data = service.history(&symbol, &period, &interval).await?;

  Ok(Json(HistoryResponse {
      symbol,
      interval,
      period,
      data,
  }))
}
