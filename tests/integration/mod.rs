//! Integration tests for applytrack-ai
//!
//! These tests exercise the orchestrator, adapters and configuration together.
//! HTTP backends are `wiremock` servers; nothing talks to a real provider.

pub mod blocking_backend_tests;
pub mod config_tests;
pub mod http_adapter_tests;
pub mod orchestrator_tests;
