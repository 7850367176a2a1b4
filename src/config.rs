use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_GRAPHQL_UPSTREAM_URL: &str = "http://localhost:8080/v1/graphql/";
pub const DEFAULT_ALLOCATION_UPSTREAM_URL: &str = "https://token-api.megaeth.com/api/allocation";
pub const DEFAULT_SALE_STATS_ID: &str = "ifyoureadthisyouareawesome";

/// Runtime configuration from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// GraphQL endpoint that every query and the passthrough route talk to
    pub graphql_upstream_url: String,
    /// REST allocation endpoint (`?entityId=` is appended per lookup)
    pub allocation_upstream_url: String,
    pub bind_addr: String,
    /// Fixed key of the singleton SaleStats row
    pub sale_stats_id: String,
    pub poll_interval: Duration,
    pub allocation_cache_ttl: Duration,
    pub http_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let graphql_upstream_url = env_url("GRAPHQL_UPSTREAM_URL")
            .unwrap_or_else(|| DEFAULT_GRAPHQL_UPSTREAM_URL.to_string());

        let allocation_upstream_url = env_url("ALLOCATION_UPSTREAM_URL")
            .unwrap_or_else(|| DEFAULT_ALLOCATION_UPSTREAM_URL.to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let sale_stats_id =
            env::var("SALE_STATS_ID").unwrap_or_else(|_| DEFAULT_SALE_STATS_ID.to_string());

        Self {
            graphql_upstream_url,
            allocation_upstream_url,
            bind_addr,
            sale_stats_id,
            poll_interval: Duration::from_millis(env_parse("POLL_INTERVAL_MS", 500)),
            allocation_cache_ttl: Duration::from_secs(env_parse("ALLOCATION_CACHE_TTL_SECS", 300)),
            http_timeout: Duration::from_secs(env_parse("HTTP_TIMEOUT_SECS", 30)),
        }
    }

    /// Same defaults as `from_env`, with both upstreams replaced.
    pub fn with_upstreams(graphql_upstream_url: &str, allocation_upstream_url: &str) -> Self {
        Self {
            graphql_upstream_url: graphql_upstream_url.to_string(),
            allocation_upstream_url: allocation_upstream_url.to_string(),
            ..Self::default()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            graphql_upstream_url: DEFAULT_GRAPHQL_UPSTREAM_URL.to_string(),
            allocation_upstream_url: DEFAULT_ALLOCATION_UPSTREAM_URL.to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            sale_stats_id: DEFAULT_SALE_STATS_ID.to_string(),
            poll_interval: Duration::from_millis(500),
            allocation_cache_ttl: Duration::from_secs(300),
            http_timeout: Duration::from_secs(30),
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Reads a URL variable, stripping surrounding quotes left by some .env editors
fn env_url(key: &str) -> Option<String> {
    let raw = env::var(key).ok()?;
    let trimmed = raw.trim();
    let without_quotes = if trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };

    if without_quotes.is_empty() {
        None
    } else {
        Some(without_quotes.to_string())
    }
}
