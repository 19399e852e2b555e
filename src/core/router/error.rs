//! Dispatch error types
//!
//! Callers only ever see these two outcomes when a dispatch does not produce a
//! response. Provider detail stays inside [`AggregateFailure`] for logs and
//! operators; [`DispatchError::user_message`] is what end users get.

use serde::Serialize;

use crate::core::providers::unified_provider::{ErrorCategory, ProviderError};

/// One classified error per provider actually attempted, in attempt order
///
/// Empty when no provider was eligible.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateFailure {
    pub errors: Vec<ProviderError>,
}

impl AggregateFailure {
    pub fn new(errors: Vec<ProviderError>) -> Self {
        Self { errors }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Provider ids in attempt order
    pub fn providers(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.provider()).collect()
    }

    pub fn categories(&self) -> Vec<ErrorCategory> {
        self.errors.iter().map(|e| e.category()).collect()
    }
}

impl std::fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "no eligible providers");
        }
        write!(f, "all {} attempted providers failed", self.errors.len())?;
        for err in &self.errors {
            write!(f, "; {}: {}", err.provider(), err.category())?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateFailure {}

/// Why a dispatch produced no response
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// Every eligible provider failed, or none was eligible
    #[error("{0}")]
    Exhausted(AggregateFailure),

    /// The caller cancelled; no further provider was tried
    #[error("request cancelled")]
    Cancelled,
}

impl DispatchError {
    pub const USER_MESSAGE: &'static str = "AI service temporarily unavailable";

    /// The only text that may reach an end user
    pub fn user_message(&self) -> &'static str {
        Self::USER_MESSAGE
    }

    pub fn aggregate(&self) -> Option<&AggregateFailure> {
        match self {
            DispatchError::Exhausted(failure) => Some(failure),
            DispatchError::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, DispatchError::Cancelled)
    }
}
