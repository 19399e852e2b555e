//! Fallback orchestrator
//!
//! Walks the registry's eligible providers in priority order, one attempt in
//! flight at a time, consulting the [`HealthTracker`] before each attempt and
//! recording the outcome after it. The first success wins; total exhaustion is
//! reported as one classified error per provider attempted.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use super::circuit_breaker::{CircuitPolicy, HealthTracker, Rejection};
use super::error::{AggregateFailure, DispatchError};
use super::execution::{dispatch_budget, effective_timeout};
use crate::config::OrchestratorConfig;
use crate::core::providers::normalizer::normalize;
use crate::core::providers::provider_registry::{ProviderRegistry, RegisteredProvider};
use crate::core::providers::unified_provider::{ErrorCategory, ProviderError};
use crate::core::types::{AIRequest, AIResponse, AttemptOutcome, CallAttempt};
use crate::utils::logging::CONTRACT_DRIFT_TARGET;

/// Result of walking one provider (including its same-provider retries)
enum ProviderOutcome {
    Success(AIResponse),
    /// The provider was tried and failed; carries its last error
    Failed(ProviderError),
    /// The circuit refused the attempt; nothing was tried
    Skipped,
    Cancelled,
}

/// Multi-provider dispatcher with fallback and circuit breaking
#[derive(Debug, Clone)]
pub struct Orchestrator {
    registry: Arc<ProviderRegistry>,
    health: Arc<HealthTracker>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        health: Arc<HealthTracker>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            registry,
            health,
            config,
        }
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    pub fn health(&self) -> &Arc<HealthTracker> {
        &self.health
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Dispatch a request across the configured providers
    ///
    /// Dropping the returned future cancels the in-flight adapter call.
    pub async fn dispatch(&self, request: &AIRequest) -> Result<AIResponse, DispatchError> {
        self.dispatch_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Dispatch, stopping without a further attempt once `cancel` fires
    pub async fn dispatch_with_cancel(
        &self,
        request: &AIRequest,
        cancel: &CancellationToken,
    ) -> Result<AIResponse, DispatchError> {
        let span = info_span!(
            "dispatch",
            dispatch_id = %Uuid::new_v4(),
            task = %request.task_type
        );
        self.walk(request, cancel).instrument(span).await
    }

    async fn walk(
        &self,
        request: &AIRequest,
        cancel: &CancellationToken,
    ) -> Result<AIResponse, DispatchError> {
        // Later reloads do not affect this dispatch
        let snapshot = self.registry.snapshot();
        let budget = dispatch_budget(self.config.global_timeout(), request.deadline());
        let deadline = Instant::now() + budget;

        debug!(
            providers = snapshot.len(),
            registry_version = snapshot.version,
            budget_ms = budget.as_millis() as u64,
            "Dispatching AI request"
        );

        let mut errors = Vec::new();
        for entry in snapshot.eligible() {
            if cancel.is_cancelled() {
                return Err(DispatchError::Cancelled);
            }
            if deadline.saturating_duration_since(Instant::now()).is_zero() {
                debug!(provider = %entry.id(), "Global deadline reached; stopping fallback");
                break;
            }

            match self.try_provider(entry, request, deadline, cancel).await {
                ProviderOutcome::Success(response) => return Ok(response),
                ProviderOutcome::Failed(err) => errors.push(err),
                ProviderOutcome::Skipped => {}
                ProviderOutcome::Cancelled => {
                    info!(provider = %entry.id(), "AI request cancelled by caller");
                    return Err(DispatchError::Cancelled);
                }
            }
        }

        let failure = AggregateFailure::new(errors);
        warn!(
            attempted = failure.len(),
            detail = %failure,
            "AI dispatch exhausted all providers"
        );
        Err(DispatchError::Exhausted(failure))
    }

    async fn try_provider(
        &self,
        entry: &RegisteredProvider,
        request: &AIRequest,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> ProviderOutcome {
        let id = entry.id();
        let policy = CircuitPolicy::from(entry.config.as_ref());
        let mut last_error = None;

        for attempt in 0..=self.config.same_provider_retries {
            let permit = match self.health.try_acquire(id) {
                Ok(permit) => permit,
                Err(rejection) => {
                    if attempt == 0 {
                        log_skip(id, rejection);
                    }
                    break;
                }
            };

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                permit.release();
                break;
            }
            let provider_timeout = entry.config.timeout();
            let timeout = effective_timeout(provider_timeout, remaining);
            let clipped = timeout < provider_timeout;

            let started_at = Utc::now();
            let started = Instant::now();
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    // Dropping the permit frees a HalfOpen trial without a verdict
                    drop(permit);
                    return ProviderOutcome::Cancelled;
                }
                result = tokio::time::timeout(
                    timeout,
                    entry.provider.attempt(request, &entry.config, timeout),
                ) => result,
            };
            let latency = started.elapsed();
            // Our own clock ran out, as opposed to an upstream 408/504 reply
            let budget_expired = match &result {
                Err(_) => true,
                Ok(Err(err)) => err.category() == ErrorCategory::Timeout && latency >= timeout,
                Ok(Ok(_)) => false,
            };

            let result = match result {
                Ok(Ok(raw)) => normalize(raw, id),
                Ok(Err(err)) => Err(err.with_provider(id)),
                Err(_) => Err(ProviderError::timeout(
                    id,
                    format!("no response within {}ms", timeout.as_millis()),
                )),
            };

            match result {
                Ok(mut response) => {
                    permit.succeed();
                    CallAttempt::new(id, started_at, latency, AttemptOutcome::Success).log();
                    response.latency_ms = latency.as_millis() as u64;
                    response.provider_id = id.to_string();
                    info!(
                        provider = %id,
                        latency_ms = response.latency_ms,
                        "AI request served"
                    );
                    return ProviderOutcome::Success(response);
                }
                Err(err) => {
                    let category = err.category();
                    CallAttempt::new(
                        id,
                        started_at,
                        latency,
                        AttemptOutcome::ProviderError(category),
                    )
                    .log();
                    if category == ErrorCategory::InvalidResponse {
                        warn!(
                            target: CONTRACT_DRIFT_TARGET,
                            provider = %id,
                            error = %err.message(),
                            "Provider response did not match the expected contract"
                        );
                    }

                    // A timeout caused by the global ceiling says nothing about the provider
                    if clipped && budget_expired {
                        permit.release();
                        return ProviderOutcome::Failed(err);
                    }
                    permit.fail(&err, &policy);

                    let retry = category.allows_same_provider_retry()
                        && attempt < self.config.same_provider_retries;
                    last_error = Some(err);
                    if !retry {
                        break;
                    }
                    debug!(provider = %id, attempt = attempt + 1, "Retrying same provider");
                }
            }
        }

        match last_error {
            Some(err) => ProviderOutcome::Failed(err),
            None => ProviderOutcome::Skipped,
        }
    }
}

fn log_skip(provider_id: &str, rejection: Rejection) {
    match rejection {
        Rejection::Disabled(category) => {
            debug!(provider = %provider_id, category = %category, "Skipping disabled provider")
        }
        Rejection::CoolingDown(remaining) => debug!(
            provider = %provider_id,
            cooldown_remaining_ms = remaining.as_millis() as u64,
            "Skipping provider with open circuit"
        ),
        Rejection::TrialInFlight => {
            debug!(provider = %provider_id, "Skipping provider; HalfOpen trial already in flight")
        }
    }
}
