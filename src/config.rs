use std::env;

pub const DEFAULT_REST_ENDPOINT: &str = "https://polkadot.api.subscan.io/api/";
pub const DEFAULT_EXPLORER_ENDPOINT: &str = "https://squid.subsquid.io/gs-explorer-polkadot/graphql";
pub const DEFAULT_STATS_ENDPOINT: &str = "https://squid.subsquid.io/gs-stats-polkadot/graphql";
pub const DEFAULT_MAIN_ENDPOINT: &str = "https://squid.subsquid.io/gs-main-polkadot/graphql";

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Runtime configuration loaded from environment variables
///
/// Environment variables:
/// - `SUBSCAN_API_KEY` (required)
/// - `SUBSCAN_REST_ENDPOINT` (default: Polkadot Subscan API)
/// - `SUBSQUID_EXPLORER_ENDPOINT` / `SUBSQUID_STATS_ENDPOINT` / `SUBSQUID_MAIN_ENDPOINT`
/// - `UPSTREAM_TIMEOUT_SECS` (default: 30)
/// - `RATE_LIMIT_MAX_RETRIES` (default: 3)
/// - `RATE_LIMIT_DEFAULT_BACKOFF_SECS` (default: 5)
/// - `ACCOUNT_CACHE_CAPACITY` (default: 100)
/// - `RUST_LOG` (default: info), the binary's log filter
#[derive(Debug, Clone)]
pub struct Config {
    pub subscan_api_key: String,
    pub rest_endpoint: String,
    pub explorer_endpoint: String,
    pub stats_endpoint: String,
    pub main_endpoint: String,
    pub upstream_timeout_secs: u64,
    pub rate_limit_max_retries: u32,
    pub rate_limit_default_backoff_secs: u64,
    pub account_cache_capacity: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let subscan_api_key = env::var("SUBSCAN_API_KEY")
            .map_err(|_| ConfigError::MissingVariable("SUBSCAN_API_KEY".to_string()))?;

        if subscan_api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "SUBSCAN_API_KEY cannot be empty".to_string(),
            ));
        }

        let rest_endpoint = endpoint_var("SUBSCAN_REST_ENDPOINT", DEFAULT_REST_ENDPOINT)?;
        let explorer_endpoint = endpoint_var("SUBSQUID_EXPLORER_ENDPOINT", DEFAULT_EXPLORER_ENDPOINT)?;
        let stats_endpoint = endpoint_var("SUBSQUID_STATS_ENDPOINT", DEFAULT_STATS_ENDPOINT)?;
        let main_endpoint = endpoint_var("SUBSQUID_MAIN_ENDPOINT", DEFAULT_MAIN_ENDPOINT)?;

        let account_cache_capacity = numeric_var("ACCOUNT_CACHE_CAPACITY", 100usize);
        if account_cache_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "ACCOUNT_CACHE_CAPACITY must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            subscan_api_key,
            rest_endpoint,
            explorer_endpoint,
            stats_endpoint,
            main_endpoint,
            upstream_timeout_secs: numeric_var("UPSTREAM_TIMEOUT_SECS", 30),
            rate_limit_max_retries: numeric_var("RATE_LIMIT_MAX_RETRIES", 3),
            rate_limit_default_backoff_secs: numeric_var("RATE_LIMIT_DEFAULT_BACKOFF_SECS", 5),
            account_cache_capacity,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn endpoint_var(name: &str, default: &str) -> Result<String, ConfigError> {
    let value = env::var(name).unwrap_or_else(|_| default.to_string());

    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(ConfigError::InvalidValue(format!(
            "{} must start with http:// or https://",
            name
        )));
    }

    Ok(value)
}

fn numeric_var<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Invalid {} '{}', defaulting to {}", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}
