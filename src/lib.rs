//! # ApplyTrack AI
//!
//! Provider fallback orchestrator for the ApplyTrack job-application tracker.
//!
//! Feature code (resume optimization, cover-letter drafting, job-match scoring,
//! interview prep, career insights) submits one canonical [`AIRequest`]; the
//! [`Orchestrator`] walks the configured text-generation backends in priority
//! order, skips the ones whose circuit is open, and returns the first
//! successful, normalized [`AIResponse`].
//!
//! ## Features
//!
//! - **Multi-Provider**: OpenRouter, OpenAI, Anthropic and Gemini adapters, plus
//!   embedder-supplied async or blocking backends
//! - **Circuit Breaking**: per-provider Closed/Open/HalfOpen state with
//!   exponential cooldown, rate-limit aware
//! - **Bounded Latency**: per-attempt and whole-dispatch timeouts, cancellation
//! - **Hot Reload**: configuration changes publish a new registry snapshot
//!
//! ## Library usage
//!
//! ```rust,no_run
//! use applytrack_ai::{AIRequest, Config, Gateway, TaskType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     let gateway = Gateway::new(config)?;
//!
//!     let request = AIRequest::new(TaskType::CoverLetterGenerate, "Draft a cover letter for ...");
//!     match gateway.orchestrator().dispatch(&request).await {
//!         Ok(response) => println!("{} (via {})", response.text, response.provider_id),
//!         Err(e) => eprintln!("{}", e.user_message()),
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::Gateway;
pub use core::providers::{
    ErrorCategory, Provider, ProviderError, ProviderRegistry, ProviderType,
};
pub use core::router::{AggregateFailure, DispatchError, HealthTracker, Orchestrator};
pub use core::traits::{ProviderAdapter, SyncBackend};
pub use core::types::{AIRequest, AIResponse, GenerationParams, TaskType, TokenUsage};
pub use utils::error::{GatewayError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Gateway build information
#[derive(Debug, Clone, serde::Serialize)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp (unix seconds)
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
            rust_version: option_env!("RUST_VERSION").unwrap_or("unknown"),
        }
    }
}

/// Build metadata captured by the build script
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
