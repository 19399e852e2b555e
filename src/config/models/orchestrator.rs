//! Orchestrator configuration

use super::*;
use crate::config::validation::Validate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fallback orchestrator settings
///
/// ## Defaults
///
/// - `global_timeout_ms`: 60000 (ceiling across the whole dispatch)
/// - `same_provider_retries`: 1 (only for Timeout/InvalidResponse)
/// - `worker_pool_size`: number of CPUs (blocking SDK backends)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Ceiling for one dispatch across every provider attempt
    #[serde(default = "default_global_timeout_ms")]
    pub global_timeout_ms: u64,
    /// Extra attempts against the same provider after Timeout/InvalidResponse
    #[serde(default = "default_same_provider_retries")]
    pub same_provider_retries: u32,
    /// Threads available to blocking SDK backends
    #[serde(default = "num_cpus::get")]
    pub worker_pool_size: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            global_timeout_ms: default_global_timeout_ms(),
            same_provider_retries: default_same_provider_retries(),
            worker_pool_size: num_cpus::get(),
        }
    }
}

impl OrchestratorConfig {
    pub fn global_timeout(&self) -> Duration {
        Duration::from_millis(self.global_timeout_ms)
    }
}

impl Validate for OrchestratorConfig {
    fn validate(&self) -> Result<(), String> {
        if self.global_timeout_ms == 0 {
            return Err("global_timeout_ms must be greater than 0".to_string());
        }
        if self.same_provider_retries > 3 {
            return Err("same_provider_retries should not exceed 3".to_string());
        }
        if self.worker_pool_size == 0 {
            return Err("worker_pool_size must be greater than 0".to_string());
        }
        Ok(())
    }
}
