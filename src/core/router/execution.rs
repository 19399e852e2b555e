//! Cooldown and deadline arithmetic

use std::time::Duration;

/// `min(base * 2^failures, max)`, saturating
pub fn cooldown_for(base: Duration, max: Duration, consecutive_failures: u32) -> Duration {
    let factor = 1u32.checked_shl(consecutive_failures).unwrap_or(u32::MAX);
    base.saturating_mul(factor).min(max)
}

/// Attempt budget: the provider timeout, clipped to what is left of the dispatch
pub fn effective_timeout(provider_timeout: Duration, remaining: Duration) -> Duration {
    provider_timeout.min(remaining)
}

/// Whole-dispatch budget: the global ceiling, tightened by the caller's deadline
pub fn dispatch_budget(global: Duration, caller_deadline: Option<Duration>) -> Duration {
    match caller_deadline {
        Some(deadline) => global.min(deadline),
        None => global,
    }
}
