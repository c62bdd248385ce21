use std::env;
use std::time::Duration as StdDuration;
use chrono::Duration;

use crate::error::AppError;

pub const DEFAULT_CACHE_TTL: &str = "300s";
pub const DEFAULT_CACHE_CAPACITY: usize = 512;
pub const DEFAULT_FANOUT_WORKERS: usize = 10;
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_YAHOO_COOKIE_URL: &str = "https://fc.yahoo.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    pub app_env: AppEnv,
    pub cache_ttl: StdDuration,
    pub cache_capacity: usize,
    pub fanout_workers: usize,
    pub provider_timeout: StdDuration,
    pub yahoo_base_url: String,
    pub yahoo_cookie_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEnv {
    Development,
    Production,
    Test,
}

impl AppEnv {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            AppEnv::Development => "stock_gateway=debug,tower_http=debug",
            AppEnv::Production | AppEnv::Test => "stock_gateway=info,tower_http=info",
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "127.0.0.1".into(),
            app_env: AppEnv::Development,
            cache_ttl: StdDuration::from_secs(300),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            fanout_workers: DEFAULT_FANOUT_WORKERS,
            provider_timeout: StdDuration::from_secs(10),
            yahoo_base_url: DEFAULT_YAHOO_BASE_URL.into(),
            yahoo_cookie_url: DEFAULT_YAHOO_COOKIE_URL.into(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        // Server config
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse::<u16>()
            .map_err(|_| AppError::ConfigError("Invalid PORT".into()))?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());

        let app_env_str = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let app_env = match app_env_str.to_lowercase().as_str() {
            "production" => AppEnv::Production,
            "test" => AppEnv::Test,
            _ => AppEnv::Development,
        };

        // Cache config
        let cache_ttl_str = env::var("CACHE_TTL").unwrap_or_else(|_| DEFAULT_CACHE_TTL.into());
        let cache_ttl = parse_std_duration(&cache_ttl_str)
            .map_err(|_| AppError::ConfigError("Invalid CACHE_TTL format".into()))?;

        let cache_capacity = parse_count("CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY)?;

        // Fan-out config
        let fanout_workers = parse_count("FANOUT_WORKERS", DEFAULT_FANOUT_WORKERS)?;

        // Provider config
        let provider_timeout_str = env::var("PROVIDER_TIMEOUT").unwrap_or_else(|_| "10s".into());
        let provider_timeout = parse_std_duration(&provider_timeout_str)
            .map_err(|_| AppError::ConfigError("Invalid PROVIDER_TIMEOUT format".into()))?;

        let yahoo_base_url =
            env::var("YAHOO_BASE_URL").unwrap_or_else(|_| DEFAULT_YAHOO_BASE_URL.into());
        let yahoo_cookie_url =
            env::var("YAHOO_COOKIE_URL").unwrap_or_else(|_| DEFAULT_YAHOO_COOKIE_URL.into());

        Ok(Self {
            port,
            host,
            app_env,
            cache_ttl,
            cache_capacity,
            fanout_workers,
            provider_timeout,
            yahoo_base_url: yahoo_base_url.trim_end_matches('/').to_string(),
            yahoo_cookie_url,
        })
    }
}

fn parse_count(var: &str, default: usize) -> Result<usize, AppError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<usize>()
            .map_err(|_| AppError::ConfigError(format!("Invalid {}", var))),
        Err(_) => Ok(default),
    }
}

fn parse_std_duration(duration_str: &str) -> Result<StdDuration, &'static str> {
    parse_duration(duration_str)?
        .to_std()
        .map_err(|_| "Duration must not be negative")
}

fn parse_duration(duration_str: &str) -> Result<Duration, &'static str> {
    let duration_str = duration_str.trim();

    if duration_str.is_empty() {
        return Err("Duration string is empty");
    }

    // Extract the number and unit parts
    let len = duration_str.len();
    let (num_part, unit_part) = duration_str.split_at(
        duration_str
            .chars()
            .position(|c| !c.is_ascii_digit())
            .unwrap_or(len)
    );

    let num = num_part.parse::<i64>().map_err(|_| "Invalid number")?;

    let duration = match unit_part {
        "s" => Duration::try_seconds(num),
        "m" => Duration::try_minutes(num),
        "h" => Duration::try_hours(num),
        "d" => Duration::try_days(num),
        _ => return Err("Unknown time unit, use s, m, h, or d"),
    };

    duration.ok_or("Duration is out of range")
}
