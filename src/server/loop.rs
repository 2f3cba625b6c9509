// Server loop module
// Accepts connections until a shutdown signal, then drains in-flight requests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::shutdown_signal;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop on `listener` until SIGINT/SIGTERM.
///
/// Open connections get `performance.shutdown_timeout` seconds to finish
/// before the loop returns.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>) {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let graceful = GracefulShutdown::new();

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections, &graceful);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_shutdown();
                break;
            }
        }
    }

    drop(listener);

    let grace = Duration::from_secs(state.config.performance.shutdown_timeout);
    tokio::select! {
        () = graceful.shutdown() => {
            tracing::info!("all connections closed");
        }
        () = tokio::time::sleep(grace) => {
            logger::log_warning(&format!(
                "{} connection(s) still open after {}s, exiting anyway",
                active_connections.load(Ordering::SeqCst),
                grace.as_secs()
            ));
        }
    }
}
