use std::sync::Arc;

use clap::Parser;

mod cli;
mod config;
mod error;
mod geo;
mod handler;
mod http;
mod logger;
mod resolver;
mod routing;
mod server;

#[cfg(test)]
mod test_support;

use error::StartupError;

fn main() -> Result<(), StartupError> {
    let opts = cli::Opts::parse();
    let cfg = config::Config::load_from(&opts.config)?;
    logger::init(&cfg)?;

    // Worker thread count from server.workers
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        tracing::info!(workers, "using configured worker threads");
    } else {
        tracing::info!("using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build().map_err(StartupError::Runtime)?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), StartupError> {
    let addr = cfg
        .get_socket_addr()
        .map_err(StartupError::InvalidListeningAddress)?;
    let listener =
        server::create_listener(addr).map_err(StartupError::HttpServerBindingFailed)?;
    let state = Arc::new(config::AppState::new(&cfg).map_err(StartupError::HttpClient)?);

    logger::log_server_start(&addr, &cfg);
    server::start_server_loop(listener, state).await;

    Ok(())
}
