//! Adapter for synchronous-only backend SDKs
//!
//! The SDK call runs on the shared [`WorkerPool`]. The attempt deadline is
//! enforced here; when it fires, the worker handle is dropped, which cancels the
//! job's token.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::core::providers::base::{WorkerError, WorkerPool};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::{ProviderAdapter, SyncBackend};
use crate::core::types::{AIRequest, RawSuccess};

#[derive(Debug, Clone)]
pub struct BlockingProvider {
    backend: Arc<dyn SyncBackend>,
    pool: WorkerPool,
}

impl BlockingProvider {
    pub fn new(backend: Arc<dyn SyncBackend>, pool: WorkerPool) -> Self {
        Self { backend, pool }
    }
}

#[async_trait]
impl ProviderAdapter for BlockingProvider {
    fn name(&self) -> &'static str {
        self.backend.name()
    }

    async fn attempt(
        &self,
        request: &AIRequest,
        config: &ProviderConfig,
        timeout: Duration,
    ) -> Result<RawSuccess, ProviderError> {
        let backend = self.backend.clone();
        let job_request = request.clone();
        let job_config = config.clone();
        let handle = self
            .pool
            .run(move |cancel| backend.complete(&job_request, &job_config, &cancel));

        match tokio::time::timeout(timeout, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(WorkerError::Closed)) => Err(ProviderError::unavailable(
                &config.id,
                "worker pool is closed",
            )),
            Ok(Err(WorkerError::Panicked(message))) => Err(ProviderError::unavailable(
                &config.id,
                format!("backend panicked: {}", message),
            )),
            Err(_) => Err(ProviderError::timeout(
                &config.id,
                format!("no reply within {}ms", timeout.as_millis()),
            )),
        }
    }
}
