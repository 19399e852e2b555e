//! Configuration data models
//!
//! This module defines all configuration structures used throughout the gateway.

pub mod gateway;
pub mod orchestrator;
pub mod provider;
pub mod server;

// Re-export all configuration types
pub use gateway::*;
pub use orchestrator::*;
pub use provider::*;
pub use server::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default per-provider attempt timeout in milliseconds
pub fn default_provider_timeout_ms() -> u64 {
    30_000
}

/// Default consecutive-failure threshold before a circuit opens
pub fn default_failure_threshold() -> u32 {
    3
}

/// Default base cooldown in milliseconds
pub fn default_base_cooldown_ms() -> u64 {
    1_000
}

/// Default cooldown cap in milliseconds
pub fn default_max_cooldown_ms() -> u64 {
    300_000
}

/// Default global dispatch ceiling in milliseconds
pub fn default_global_timeout_ms() -> u64 {
    60_000
}

/// Default same-provider retries for Timeout/InvalidResponse
pub fn default_same_provider_retries() -> u32 {
    1
}

/// Default maximum request body size in bytes
pub fn default_max_body_size() -> usize {
    1024 * 1024
}

pub fn default_true() -> bool {
    true
}
