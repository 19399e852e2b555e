//! Logging setup and shared log targets
//!
//! Routine request and attempt logs go to the module's own target. Two extra
//! targets let operators route the signals they act on:
//!
//! - [`OPERATOR_TARGET`]: providers disabled for the process lifetime
//!   (bad credentials, rejected configuration)
//! - [`CONTRACT_DRIFT_TARGET`]: payloads that no longer match the expected shape

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Operator-facing failures that need a human
pub const OPERATOR_TARGET: &str = "applytrack_ai::operator";

/// Backend replies that stopped matching the adapter's contract
pub const CONTRACT_DRIFT_TARGET: &str = "applytrack_ai::contract_drift";

const DEFAULT_FILTER: &str = "info";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// `--log-json` wins; otherwise `LOG_FORMAT=json` selects JSON output
    pub fn resolve(json_flag: bool) -> Self {
        if json_flag {
            return LogFormat::Json;
        }
        match std::env::var("LOG_FORMAT") {
            Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Install the global tracing subscriber
///
/// Filtering follows `RUST_LOG`, defaulting to `info`. Calling this twice is
/// harmless; the second subscriber is ignored.
pub fn init_logging(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Mask a credential for logging, keeping only a short prefix
pub fn redact_key(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    if key.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("{}****", prefix)
    }
}
