use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stock_gateway::{api, config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Load configuration
    let config = config::Config::from_env()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.app_env.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        cache_ttl_secs = config.cache_ttl.as_secs(),
        cache_capacity = config.cache_capacity,
        fanout_workers = config.fanout_workers,
        "Loaded configuration"
    );

    // Build our application with routes
    let app = api::router::create_router(&config)?;

    // Run our application
    let ip = config.host.parse::<std::net::IpAddr>()?;
    let addr = SocketAddr::from((ip, config.port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
