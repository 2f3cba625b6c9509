//! Logger module
//!
//! Thin facade over `tracing` for the proxy:
//! - Subscriber setup from the logging config (overridable with `RUST_LOG`)
//! - Server lifecycle logging
//! - Access logging in several formats, on the `access` target
//! - Upstream failure logging

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::Config;
use crate::error::UpstreamError;

/// Initialize the global subscriber
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        %addr,
        level = %config.logging.level,
        workers = ?config.server.workers,
        max_connections = ?config.performance.max_connections,
        upstream = %config.upstream.graphql_url,
        "proxy listening on http://{addr}"
    );
}

pub fn log_shutdown() {
    tracing::info!("shutdown requested, no longer accepting connections");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!(%peer_addr, "connection accepted");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Upstream failures surface to callers as a bare 500, so the cause goes here
pub fn log_upstream_error(err: &UpstreamError) {
    match std::error::Error::source(err) {
        Some(source) => tracing::error!(error = %err, cause = %source, "upstream call failed"),
        None => tracing::error!(error = %err, "upstream call failed"),
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}
