// Application state module
// Shared, read-mostly state handed to every connection

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::sync::watch;

use super::types::Config;
use crate::templates::TemplateEngine;

/// Application state
pub struct AppState {
    pub config: Config,
    pub templates: TemplateEngine,
    /// Connections currently being served
    pub active_connections: Arc<AtomicUsize>,
    /// Flipped to `true` once the accept loop stops; open connections
    /// finish their in-flight request and close
    pub draining: watch::Sender<bool>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            templates: TemplateEngine::new(&config.templates),
            config: config.clone(),
            active_connections: Arc::new(AtomicUsize::new(0)),
            draining: watch::channel(false).0,
        }
    }
}
