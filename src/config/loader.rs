//! Configuration file loading

use super::models::GatewayConfig;
use crate::utils::error::{GatewayError, Result};
use std::path::Path;
use tracing::debug;

/// Parse a YAML configuration document after environment expansion
pub fn parse_yaml(content: &str) -> Result<GatewayConfig> {
    let expanded = expand_env_vars(content);
    serde_yaml::from_str(&expanded)
        .map_err(|e| GatewayError::Config(format!("Failed to parse config: {}", e)))
}

/// Read and parse a configuration file
pub async fn load_file(path: &Path) -> Result<GatewayConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| GatewayError::Config(format!("Failed to read config file: {}", e)))?;
    let config = parse_yaml(&content)?;
    debug!(path = ?path, providers = config.providers.len(), "Parsed configuration file");
    Ok(config)
}

/// Expand `${VAR_NAME}` references in configuration strings
///
/// Unknown variables expand to an empty string so a missing credential
/// surfaces as a provider ConfigError instead of a literal placeholder key.
pub fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                result.push_str(&std::env::var(name).unwrap_or_default());
                rest = &after[end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}
