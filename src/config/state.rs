// Application state module
// Immutable per-process state shared by every request

use std::time::Duration;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Pooled client for GraphQL lookups and asset fetches
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        // No total deadline here: asset bodies stream for as long as they
        // keep making progress. Lookups set their own request timeout.
        let idle = Duration::from_secs(config.upstream.timeout_secs);
        let client = reqwest::Client::builder()
            .user_agent(config.upstream.user_agent.as_str())
            .connect_timeout(idle)
            .read_timeout(idle)
            .build()?;

        Ok(Self {
            config: config.clone(),
            client,
        })
    }
}
