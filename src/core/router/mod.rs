//! Core router: provider health tracking and fallback dispatch
//!
//! ## Module Structure
//!
//! - `circuit_breaker` - Per-provider Closed/Open/HalfOpen state, keyed store
//! - `error` - Aggregate failure and dispatch outcome types
//! - `execution` - Cooldown and deadline arithmetic
//! - `orchestrator` - Priority-ordered fallback dispatch

pub mod circuit_breaker;
pub mod error;
pub mod execution;
pub mod orchestrator;

pub use circuit_breaker::{
    AttemptPermit, CircuitPolicy, CircuitState, HealthTracker, ProviderHealthState, Rejection,
};
pub use error::{AggregateFailure, DispatchError};
pub use orchestrator::Orchestrator;
