//! Per-provider circuit breaker
//!
//! State lives in a keyed store: one record per provider id, each behind its
//! own mutex, so failures against one provider never contend with another.
//!
//! - **Closed**: attempts flow freely. Transient failures (Timeout,
//!   InvalidResponse, Unavailable) accumulate; reaching the threshold opens the
//!   circuit for `min(base * 2^failures, max)`.
//! - **Open**: no attempts until `cooldown_until`. The first
//!   [`HealthTracker::try_acquire`] after expiry moves to HalfOpen and gets the
//!   single trial permit.
//! - **HalfOpen**: exactly one trial in flight. Success closes and resets the
//!   streak; failure reopens with the cooldown recomputed from the new count.
//! - **RateLimited** opens immediately for the advertised `Retry-After`, capped
//!   at `max_cooldown` (or the backoff formula), without adding a strike.
//! - **AuthError / ConfigError** disable the provider for the process lifetime.

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::execution::cooldown_for;
use crate::config::ProviderConfig;
use crate::core::providers::unified_provider::{ErrorCategory, ProviderError};
use crate::utils::logging::OPERATOR_TARGET;

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CircuitState {
    /// Normal operation - requests pass through
    Closed,
    /// Cooling down - requests are rejected
    Open,
    /// Probing - a single trial request is allowed
    HalfOpen,
}

/// Thresholds for one provider, taken from its configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitPolicy {
    pub failure_threshold: u32,
    pub base_cooldown: Duration,
    pub max_cooldown: Duration,
}

impl CircuitPolicy {
    pub fn cooldown(&self, consecutive_failures: u32) -> Duration {
        cooldown_for(self.base_cooldown, self.max_cooldown, consecutive_failures)
    }
}

impl From<&ProviderConfig> for CircuitPolicy {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            failure_threshold: config.failure_threshold.max(1),
            base_cooldown: config.base_cooldown(),
            max_cooldown: config.max_cooldown(),
        }
    }
}

impl Default for CircuitPolicy {
    fn default() -> Self {
        Self::from(&ProviderConfig::default())
    }
}

/// Why an attempt was not admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Permanently excluded after an auth or config failure
    Disabled(ErrorCategory),
    /// Open; the remaining cooldown
    CoolingDown(Duration),
    /// HalfOpen and the single trial is already running
    TrialInFlight,
}

#[derive(Debug)]
struct HealthRecord {
    state: CircuitState,
    consecutive_failures: u32,
    cooldown_until: Option<Instant>,
    trial_in_flight: bool,
    disabled: Option<ErrorCategory>,
    last_error: Option<String>,
}

impl Default for HealthRecord {
    fn default() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            cooldown_until: None,
            trial_in_flight: false,
            disabled: None,
            last_error: None,
        }
    }
}

impl HealthRecord {
    fn open(&mut self, cooldown: Duration) {
        self.state = CircuitState::Open;
        let now = Instant::now();
        // Callers clamp to the policy maximum; a far-future instant is not
        // representable on every platform.
        self.cooldown_until = Some(
            now.checked_add(cooldown)
                .unwrap_or_else(|| now + Duration::from_secs(86_400)),
        );
        self.trial_in_flight = false;
    }

    fn close(&mut self) {
        self.state = CircuitState::Closed;
        self.consecutive_failures = 0;
        self.cooldown_until = None;
        self.trial_in_flight = false;
    }
}

/// Point-in-time view of one provider's health
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderHealthState {
    pub provider_id: String,
    pub state: CircuitState,
    pub consecutive_failures: u32,
    /// Milliseconds until the cooldown expires; `None` when not cooling down
    pub cooldown_remaining_ms: Option<u64>,
    /// Category that disabled the provider for the process lifetime
    pub disabled: Option<ErrorCategory>,
    pub last_error: Option<String>,
}

/// Keyed store of per-provider health records
#[derive(Debug, Default)]
pub struct HealthTracker {
    records: DashMap<String, Arc<Mutex<HealthRecord>>>,
}

impl HealthTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, provider_id: &str) -> Arc<Mutex<HealthRecord>> {
        if let Some(record) = self.records.get(provider_id) {
            return record.value().clone();
        }
        self.records
            .entry(provider_id.to_string())
            .or_default()
            .value()
            .clone()
    }

    /// Ask to attempt `provider_id`
    ///
    /// Performs the lazy Open to HalfOpen transition. At most one HalfOpen
    /// trial permit exists per provider at any time.
    pub fn try_acquire(&self, provider_id: &str) -> Result<AttemptPermit, Rejection> {
        let record = self.record(provider_id);
        let trial = {
            let mut health = record.lock();
            if let Some(category) = health.disabled {
                return Err(Rejection::Disabled(category));
            }
            match health.state {
                CircuitState::Closed => false,
                CircuitState::Open => {
                    let now = Instant::now();
                    match health.cooldown_until {
                        Some(until) if now < until => {
                            return Err(Rejection::CoolingDown(until - now));
                        }
                        _ => {
                            debug!(provider = %provider_id, "Circuit transitioning from Open to HalfOpen");
                            health.state = CircuitState::HalfOpen;
                            health.trial_in_flight = true;
                            true
                        }
                    }
                }
                CircuitState::HalfOpen => {
                    if health.trial_in_flight {
                        return Err(Rejection::TrialInFlight);
                    }
                    health.trial_in_flight = true;
                    true
                }
            }
        };

        Ok(AttemptPermit {
            provider_id: provider_id.to_string(),
            record,
            trial,
            resolved: false,
        })
    }

    /// Whether an attempt would currently be admitted, without taking a permit
    pub fn is_available(&self, provider_id: &str) -> bool {
        let Some(record) = self.records.get(provider_id).map(|r| r.value().clone()) else {
            return true;
        };
        let health = record.lock();
        if health.disabled.is_some() {
            return false;
        }
        match health.state {
            CircuitState::Closed => true,
            CircuitState::Open => health
                .cooldown_until
                .is_none_or(|until| Instant::now() >= until),
            CircuitState::HalfOpen => !health.trial_in_flight,
        }
    }

    /// Health of one provider; unknown providers report a fresh Closed record
    pub fn state(&self, provider_id: &str) -> ProviderHealthState {
        match self.records.get(provider_id).map(|r| r.value().clone()) {
            Some(record) => view(provider_id, &record.lock()),
            None => view(provider_id, &HealthRecord::default()),
        }
    }

    /// Health of every tracked provider, sorted by id
    pub fn snapshot(&self) -> Vec<ProviderHealthState> {
        let records: Vec<(String, Arc<Mutex<HealthRecord>>)> = self
            .records
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        let mut states: Vec<ProviderHealthState> = records
            .iter()
            .map(|(id, record)| view(id, &record.lock()))
            .collect();
        states.sort_by(|a, b| a.provider_id.cmp(&b.provider_id));
        states
    }

    /// Forget everything about a provider (its configuration changed)
    pub fn reset(&self, provider_id: &str) {
        if self.records.remove(provider_id).is_some() {
            info!(provider = %provider_id, "Health state reset");
        }
    }
}

fn view(provider_id: &str, health: &HealthRecord) -> ProviderHealthState {
    let now = Instant::now();
    let remaining = health
        .cooldown_until
        .filter(|until| *until > now)
        .map(|until| (until - now).as_millis() as u64);
    let state = match health.state {
        // Cooldown over; the next attempt will be the HalfOpen trial
        CircuitState::Open if health.disabled.is_none() && remaining.is_none() => {
            CircuitState::HalfOpen
        }
        state => state,
    };
    ProviderHealthState {
        provider_id: provider_id.to_string(),
        state,
        consecutive_failures: health.consecutive_failures,
        cooldown_remaining_ms: remaining,
        disabled: health.disabled,
        last_error: health.last_error.clone(),
    }
}

/// Admission to make one attempt against a provider
///
/// Must be resolved with [`succeed`](Self::succeed), [`fail`](Self::fail) or
/// [`release`](Self::release). Dropping an unresolved trial permit (e.g. the
/// dispatch was cancelled) frees the trial slot without recording an outcome.
#[derive(Debug)]
pub struct AttemptPermit {
    provider_id: String,
    record: Arc<Mutex<HealthRecord>>,
    trial: bool,
    resolved: bool,
}

impl AttemptPermit {
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// Whether this is the single HalfOpen trial
    pub fn is_trial(&self) -> bool {
        self.trial
    }

    /// Record a success: Closed, streak reset
    pub fn succeed(mut self) {
        self.resolved = true;
        let mut health = self.record.lock();
        if health.disabled.is_some() {
            return;
        }
        if health.state != CircuitState::Closed {
            info!(provider = %self.provider_id, "Circuit closed after successful attempt");
        }
        health.close();
        health.last_error = None;
    }

    /// Record a classified failure and return the resulting state
    pub fn fail(mut self, error: &ProviderError, policy: &CircuitPolicy) -> CircuitState {
        self.resolved = true;
        let category = error.category();
        let mut health = self.record.lock();
        health.last_error = Some(error.to_string());

        if health.disabled.is_some() {
            return CircuitState::Open;
        }

        if category.is_permanent() {
            health.disabled = Some(category);
            health.state = CircuitState::Open;
            health.cooldown_until = None;
            health.trial_in_flight = false;
            error!(
                target: OPERATOR_TARGET,
                provider = %self.provider_id,
                category = %category,
                error = %error.message(),
                "Provider disabled for the process lifetime"
            );
            return CircuitState::Open;
        }

        // A non-trial attempt admitted before another request opened the
        // circuit reports late; that streak was already counted.
        if !self.trial && health.state != CircuitState::Closed {
            return health.state;
        }

        if category == ErrorCategory::RateLimited {
            let cooldown = error
                .retry_after()
                .map(|advertised| advertised.min(policy.max_cooldown))
                .unwrap_or_else(|| policy.cooldown(health.consecutive_failures));
            health.open(cooldown);
            warn!(
                provider = %self.provider_id,
                cooldown_ms = cooldown.as_millis() as u64,
                "Provider rate limited; cooling down"
            );
            return CircuitState::Open;
        }

        health.consecutive_failures = health.consecutive_failures.saturating_add(1);
        if self.trial || health.consecutive_failures >= policy.failure_threshold {
            let cooldown = policy.cooldown(health.consecutive_failures);
            health.open(cooldown);
            warn!(
                provider = %self.provider_id,
                consecutive_failures = health.consecutive_failures,
                cooldown_ms = cooldown.as_millis() as u64,
                "Circuit opened"
            );
            return CircuitState::Open;
        }
        health.state
    }

    /// Give the permit back without recording an outcome
    pub fn release(mut self) {
        self.resolved = true;
        self.free_trial();
    }

    fn free_trial(&self) {
        if self.trial {
            let mut health = self.record.lock();
            if health.state == CircuitState::HalfOpen {
                health.trial_in_flight = false;
            }
        }
    }
}

impl Drop for AttemptPermit {
    fn drop(&mut self) {
        if !self.resolved {
            self.free_trial();
        }
    }
}
