//! Test fixtures and scripted backends

use applytrack_ai::config::{OrchestratorConfig, ProviderConfig};
use applytrack_ai::core::providers::{ProviderError, ProviderRegistry};
use applytrack_ai::core::router::{HealthTracker, Orchestrator};
use applytrack_ai::core::types::{AIRequest, RawSuccess, TaskType};
use applytrack_ai::ProviderAdapter;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// One scripted reply
#[derive(Debug, Clone)]
pub enum Step {
    Reply(Result<RawSuccess, ProviderError>),
    /// Sleep, then reply
    Delayed(Duration, Result<RawSuccess, ProviderError>),
}

/// In-process adapter that replays a script, then succeeds
///
/// Counts calls and tracks how many attempts are in flight at once.
#[derive(Debug, Default)]
pub struct ScriptedAdapter {
    script: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedAdapter {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn scripted(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.into()),
            ..Default::default()
        })
    }

    /// Fail every call with `error`
    pub fn failing(error: ProviderError, times: usize) -> Arc<Self> {
        Self::scripted(vec![Step::Reply(Err(error)); times])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProviderAdapter for ScriptedAdapter {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn attempt(
        &self,
        _request: &AIRequest,
        config: &ProviderConfig,
        _timeout: Duration,
    ) -> Result<RawSuccess, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let step = self.script.lock().pop_front();
        match step {
            Some(Step::Reply(result)) => result,
            Some(Step::Delayed(delay, result)) => {
                tokio::time::sleep(delay).await;
                result
            }
            None => Ok(RawSuccess::text(format!("generated by {}", config.id))),
        }
    }
}

/// Provider config for a scripted backend registered under its own id
pub fn scripted_config(id: &str, priority: i32, threshold: u32) -> ProviderConfig {
    ProviderConfig::new(id, id, "scripted-model")
        .with_priority(priority)
        .with_failure_threshold(threshold)
        .with_cooldown(Duration::from_secs(1), Duration::from_secs(60))
}

/// Orchestrator over scripted backends, in the given priority order
pub fn orchestrator_with(
    providers: Vec<(&str, Arc<ScriptedAdapter>)>,
    threshold: u32,
) -> Orchestrator {
    orchestrator_with_config(
        providers,
        threshold,
        OrchestratorConfig {
            same_provider_retries: 0,
            ..Default::default()
        },
    )
}

pub fn orchestrator_with_config(
    providers: Vec<(&str, Arc<ScriptedAdapter>)>,
    threshold: u32,
    config: OrchestratorConfig,
) -> Orchestrator {
    let registry = ProviderRegistry::new(2).expect("registry");
    let mut configs = Vec::new();
    for (index, (id, adapter)) in providers.into_iter().enumerate() {
        registry.register_adapter(id, adapter);
        configs.push(scripted_config(id, index as i32, threshold));
    }
    let report = registry.reload(&configs);
    assert!(report.rejected.is_empty(), "unexpected rejections: {:?}", report);
    Orchestrator::new(Arc::new(registry), Arc::new(HealthTracker::new()), config)
}

pub fn request() -> AIRequest {
    AIRequest::new(TaskType::ResumeOptimize, "Rewrite this bullet: led a team of 5")
}
