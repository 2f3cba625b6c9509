//! Error types

use thiserror::Error;

/// Failures that stop the process before it starts serving
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Cannot load configuration")]
    Config(#[from] config::ConfigError),

    #[error("Listening address is invalid: {0}")]
    InvalidListeningAddress(String),

    #[error("Cannot bind http server to the requested address")]
    HttpServerBindingFailed(#[source] std::io::Error),

    #[error("Cannot build the tokio runtime")]
    Runtime(#[source] std::io::Error),

    #[error("Cannot set global tracing subscriber")]
    DefaultSubscriberInitFailed(#[from] tracing_subscriber::util::TryInitError),

    #[error("Cannot build the upstream http client")]
    HttpClient(#[source] reqwest::Error),
}

/// Why a call to the GraphQL index or an asset host failed
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("cannot decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
