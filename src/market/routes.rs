use axum::{
  routing::{get, post},
  Router,
};

use crate::market::{handler, service::MarketService};

pub fn market_routes(service: MarketService) -> Router {
  Router::new()
      .route("/stock", get(handler::get_stock))
      .route("/stocks", post(handler::get_stocks))
      .route("/history", get(handler::get_history))
      .with_state(service)
}
