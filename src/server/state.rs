//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::Gateway;

/// HTTP server state shared across handlers
///
/// Cheap to clone; every component inside the gateway is behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub gateway: Gateway,
}

impl AppState {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        self.gateway.config()
    }
}
