//! Core traits module
//!
//! The capability interfaces every backend implements. The orchestrator only
//! talks to backends through these.

pub mod provider;

pub use provider::{ProviderAdapter, SyncBackend};
