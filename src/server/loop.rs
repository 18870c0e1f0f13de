// Server loop module
// Accepts connections until shutdown, then lets in-flight requests finish

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How often the drain phase re-checks the connection counter
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Accept connections until `shutdown` is notified.
///
/// Must run inside a `LocalSet`: connections are served on local tasks.
/// After shutdown, idle keep-alive connections are closed and busy ones
/// finish their current request; waits up to `max(read_timeout,
/// write_timeout)` for them before returning.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> std::io::Result<()> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            _ = shutdown.notified() => break,
        }
    }

    // Stop accepting, then ask open connections to wind down
    drop(listener);
    state.draining.send_replace(true);
    logger::log_shutdown(state.active_connections.load(Ordering::SeqCst));

    let perf = &state.config.performance;
    let grace = Duration::from_secs(std::cmp::max(perf.read_timeout, perf.write_timeout));
    let drained = tokio::time::timeout(grace, async {
        while state.active_connections.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(DRAIN_POLL).await;
        }
    })
    .await;

    if drained.is_err() {
        logger::log_warning(&format!(
            "{} connection(s) still open after {}s grace period",
            state.active_connections.load(Ordering::SeqCst),
            grace.as_secs()
        ));
    }

    Ok(())
}
