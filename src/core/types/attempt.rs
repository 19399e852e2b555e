//! Per-attempt observability record

use crate::core::providers::unified_provider::ErrorCategory;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Outcome of a single adapter call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    ProviderError(ErrorCategory),
}

/// One adapter invocation made while serving a dispatch
///
/// Produced for every attempt, logged, then dropped. Nothing here is persisted.
#[derive(Debug, Clone)]
pub struct CallAttempt {
    pub provider_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: AttemptOutcome,
    pub latency: Duration,
}

impl CallAttempt {
    pub fn new(
        provider_id: impl Into<String>,
        started_at: DateTime<Utc>,
        latency: Duration,
        outcome: AttemptOutcome,
    ) -> Self {
        let finished_at = started_at
            + chrono::Duration::from_std(latency).unwrap_or_else(|_| chrono::Duration::zero());
        Self {
            provider_id: provider_id.into(),
            started_at,
            finished_at,
            outcome,
            latency,
        }
    }

    pub fn latency_ms(&self) -> u64 {
        self.latency.as_millis() as u64
    }

    pub fn is_success(&self) -> bool {
        self.outcome == AttemptOutcome::Success
    }

    /// Emit the attempt to the log
    pub fn log(&self) {
        match self.outcome {
            AttemptOutcome::Success => tracing::debug!(
                provider = %self.provider_id,
                latency_ms = self.latency_ms(),
                "provider attempt succeeded"
            ),
            AttemptOutcome::ProviderError(category) => tracing::warn!(
                provider = %self.provider_id,
                latency_ms = self.latency_ms(),
                category = %category,
                "provider attempt failed"
            ),
        }
    }
}
