//! Custom test assertions

use applytrack_ai::core::router::DispatchError;
use applytrack_ai::{AIResponse, ErrorCategory};

/// Assertions for AIResponse
pub trait AIResponseAssertions {
    /// Assert the response came from `provider_id` and has text
    fn assert_served_by(&self, provider_id: &str);

    /// Assert response has usage information
    fn assert_has_usage(&self);
}

impl AIResponseAssertions for AIResponse {
    fn assert_served_by(&self, provider_id: &str) {
        assert_eq!(
            self.provider_id, provider_id,
            "Expected response from {}, got {}",
            provider_id, self.provider_id
        );
        assert!(!self.text.trim().is_empty(), "Expected non-empty text");
    }

    fn assert_has_usage(&self) {
        let usage = self
            .usage
            .as_ref()
            .unwrap_or_else(|| panic!("Expected usage on response from {}", self.provider_id));
        assert!(usage.total_tokens.is_some(), "Expected total_tokens");
    }
}

/// Assert an exhausted dispatch attempted exactly these providers with these categories
pub fn assert_exhausted(err: &DispatchError, expected: &[(&str, ErrorCategory)]) {
    let failure = err
        .aggregate()
        .unwrap_or_else(|| panic!("Expected exhausted dispatch, got {:?}", err));
    let actual: Vec<(&str, ErrorCategory)> = failure
        .errors
        .iter()
        .map(|e| (e.provider(), e.category()))
        .collect();
    assert_eq!(actual, expected);
}
