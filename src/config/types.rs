// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub upstream: UpstreamConfig,
    pub geo: GeoConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG` when set
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    /// Deadline for a client to send request headers, 0 disables
    pub read_timeout: u64,
    /// Seconds open connections get to finish after a shutdown signal
    pub shutdown_timeout: u64,
    pub max_connections: Option<u64>,
}

/// GraphQL index the resolver talks to
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    pub graphql_url: String,
    /// Whole-request deadline for GraphQL lookups; for asset fetches only
    /// the connect and between-reads deadline
    pub timeout_secs: u64,
    pub user_agent: String,
}

/// Inbound headers carrying the caller's approximate location,
/// as stamped by the edge/CDN in front of the proxy
#[derive(Debug, Deserialize, Clone)]
pub struct GeoConfig {
    pub latitude_header: String,
    pub longitude_header: String,
}
