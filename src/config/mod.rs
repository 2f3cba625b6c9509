// Configuration module entry point
// Loads layered configuration and builds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

use config::builder::DefaultState;
use config::ConfigBuilder;

// Re-export public types
pub use state::AppState;
pub use types::{Config, GeoConfig};

pub const DEFAULT_GRAPHQL_URL: &str = "https://orion.joystream.org/graphql";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = Self::builder_with_defaults()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("PROXY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Builder pre-populated with every default; sources added later win
    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8787)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.shutdown_timeout", 10)?
            .set_default("upstream.graphql_url", DEFAULT_GRAPHQL_URL)?
            .set_default("upstream.timeout_secs", 30)?
            .set_default(
                "upstream.user_agent",
                concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("geo.latitude_header", "cf-iplatitude")?
            .set_default("geo.longitude_header", "cf-iplongitude")
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
impl Config {
    /// Defaults plus an inline TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        Self::builder_with_defaults()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Defaults pointed at a local upstream
    pub fn for_upstream(graphql_url: &str) -> Self {
        Self::from_toml_str(&format!(
            "[upstream]\ngraphql_url = \"{graphql_url}\"\ntimeout_secs = 5\n"
        ))
        .unwrap()
    }
}
