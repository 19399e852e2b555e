//! Configuration validation
//!
//! This module provides validation logic for all configuration structures.

use super::models::*;
use std::collections::HashSet;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<(), String> {
        self.server
            .validate()
            .map_err(|e| format!("Server config error: {}", e))?;
        self.orchestrator
            .validate()
            .map_err(|e| format!("Orchestrator config error: {}", e))?;

        // Per-provider problems are not fatal here: the registry rejects those
        // entries individually. Duplicate ids would make health records ambiguous.
        let mut seen = HashSet::new();
        for provider in &self.providers {
            if !seen.insert(provider.id.as_str()) {
                return Err(format!("Duplicate provider id: {}", provider.id));
            }
        }
        Ok(())
    }
}
