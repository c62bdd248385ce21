use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;
use thiserror::Error;

use crate::market::provider::ProviderError;

#[derive(Error, Debug)]
pub enum AppError {
  #[error("{0}")]
  MissingParameter(String),

  #[error("{0}")]
  InvalidRequest(String),

  #[error("{message}")]
  NotFound {
      message: String,
      symbol: Option<String>,
  },

  #[error("{0}")]
  UpstreamFailure(String),

  #[error("Config error: {0}")]
  ConfigError(String),
}

impl AppError {
  pub fn not_found(message: impl Into<String>) -> Self {
      Self::NotFound {
          message: message.into(),
          symbol: None,
      }
  }

  pub fn status_code(&self) -> StatusCode {
      match self {
          AppError::MissingParameter(_) | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
          AppError::NotFound { .. } => StatusCode::NOT_FOUND,
          AppError::UpstreamFailure(_) | AppError::ConfigError(_) => {
              StatusCode::INTERNAL_SERVER_ERROR
          }
      }
  }
}

impl From<ProviderError> for AppError {
  fn from(err: ProviderError) -> Self {
      Self::UpstreamFailure(err.to_string())
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
      let status = self.status_code();

      let body = match self {
          AppError::NotFound {
              message,
              symbol: Some(symbol),
          } => json!({
              "error": message,
              "symbol": symbol,
          }),
          AppError::ConfigError(_) => json!({
              "error": "A configuration error occurred",
          }),
          other => json!({
              "error": other.to_string(),
          }),
      };

      (status, Json(body)).into_response()
  }
}
