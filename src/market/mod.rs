pub mod cache;
pub mod handler;
pub mod model;
pub mod provider;
pub mod routes;
pub mod service;
