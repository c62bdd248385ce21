use axum::{
  routing::get,
  http::StatusCode,
  Json, Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

use crate::{
  config::Config,
  error::AppError,
  market::{routes::market_routes, service::MarketService},
};

pub fn create_router(config: &Config) -> Result<Router, AppError> {
  let market_service = MarketService::from_config(config)?;
  Ok(router_with_service(market_service))
}

/// Router over an already-built service; lets tests swap the provider.
pub fn router_with_service(market_service: MarketService) -> Router {
  // Setup CORS
  let cors = CorsLayer::new()
      .allow_origin(Any)
      .allow_methods(Any)
      .allow_headers(Any);

  Router::new()
      .route("/", get(health_check))
      .route("/health", get(health_check))
      .merge(market_routes(market_service))
      .layer(
          ServiceBuilder::new()
              .layer(TraceLayer::new_for_http())
              .layer(cors),
      )
}

async fn health_check() -> (StatusCode, Json<serde_json::Value>) {
  (
      StatusCode::OK,
      Json(json!({
          "status": "success",
          "message": "Stock gateway is running"
      })),
  )
}
