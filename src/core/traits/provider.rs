//! Backend capability interfaces
//!
//! # Design Principles
//!
//! 1. **One call per invocation**: an adapter performs exactly one backend call
//!    and never retries; retry and fallback policy belongs to the orchestrator.
//! 2. **Classified failures**: every backend-specific failure is converted to a
//!    [`ProviderError`] before it leaves the adapter.
//! 3. **Raw success**: adapters return the untouched payload; normalization is a
//!    separate pure step.

use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::ProviderConfig;
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::{AIRequest, RawSuccess};

/// Asynchronous backend adapter
///
/// Implemented by the built-in HTTP adapters and by embedder-supplied backends
/// registered through `ProviderRegistry::register_backend`.
#[async_trait]
pub trait ProviderAdapter: Send + Sync + std::fmt::Debug {
    /// Backend family name, used in logs
    fn name(&self) -> &'static str;

    /// Perform a single call against the backend
    ///
    /// `timeout` is the time left for this attempt; implementations should
    /// give up once it elapses.
    async fn attempt(
        &self,
        request: &AIRequest,
        config: &ProviderConfig,
        timeout: Duration,
    ) -> Result<RawSuccess, ProviderError>;
}

/// Synchronous-only backend, run on the bounded worker pool
///
/// Implementations should check `cancel` between blocking steps and return
/// early once it is raised; the result is discarded anyway.
pub trait SyncBackend: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    fn complete(
        &self,
        request: &AIRequest,
        config: &ProviderConfig,
        cancel: &CancellationToken,
    ) -> Result<RawSuccess, ProviderError>;
}
