//! Canonical types shared by adapters, the normalizer and the orchestrator

pub mod attempt;
pub mod requests;
pub mod responses;

pub use attempt::{AttemptOutcome, CallAttempt};
pub use requests::{AIRequest, GenerationParams, TaskType};
pub use responses::{AIResponse, RawPayload, RawSuccess, TokenUsage};
