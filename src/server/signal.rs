// Signal handling module (nginx-style)
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)
// - SIGUSR1: Reopen log files

use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Signal handler state
#[derive(Default)]
pub struct SignalHandler {
    /// Shutdown signal (SIGTERM, SIGINT), awaited by the server loop
    pub shutdown: Arc<Notify>,
}

impl SignalHandler {
    /// Ask the server loop to stop accepting connections
    pub fn request_shutdown(&self) {
        // notify_one keeps a permit if the loop is not waiting right now
        self.shutdown.notify_one();
    }
}

/// Start signal handlers (Unix only)
///
/// | Signal  | Action           | Nginx Equivalent    |
/// |---------|------------------|---------------------|
/// | SIGTERM | Graceful stop    | `nginx -s stop`     |
/// | SIGINT  | Graceful stop    | Ctrl+C              |
/// | SIGUSR1 | Reopen log files | `nginx -s reopen`   |
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let registered = (|| {
            Ok::<_, std::io::Error>((
                signal(SignalKind::terminate())?,
                signal(SignalKind::interrupt())?,
                signal(SignalKind::user_defined1())?,
            ))
        })();
        let (mut sigterm, mut sigint, mut sigusr1) = match registered {
            Ok(signals) => signals,
            Err(e) => {
                logger::log_error(&format!("Failed to register signal handlers: {e}"));
                return;
            }
        };

        logger::log_info(&format!(
            "Signal handlers registered (pid {}): TERM/INT stop, USR1 reopens logs",
            std::process::id()
        ));

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    logger::log_info("SIGTERM received, shutting down gracefully");
                    handler.request_shutdown();
                    break;
                }

                _ = sigint.recv() => {
                    logger::log_info("SIGINT received, shutting down gracefully");
                    handler.request_shutdown();
                    break;
                }

                _ = sigusr1.recv() => {
                    logger::reopen();
                }
            }
        }
    });
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_info("Ctrl+C received, shutting down gracefully");
            handler.request_shutdown();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_permit_is_kept() {
        let handler = SignalHandler::default();
        handler.request_shutdown();
        // Notified before anyone waited; the stored permit completes this
        tokio::time::timeout(std::time::Duration::from_secs(1), handler.shutdown.notified())
            .await
            .unwrap();
    }
}
