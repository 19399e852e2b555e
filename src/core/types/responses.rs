//! Canonical AI response types
//!
//! Adapters return a [`RawSuccess`] holding the backend's untouched payload;
//! the normalizer turns it into the canonical [`AIResponse`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Token accounting reported by a backend
///
/// Fields are `None` when the backend omits them. Zero would claim that no
/// tokens were consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

impl TokenUsage {
    /// Build usage, deriving the total when only the parts are known
    pub fn new(prompt: Option<u32>, completion: Option<u32>, total: Option<u32>) -> Self {
        let total = total.or(match (prompt, completion) {
            (Some(p), Some(c)) => Some(p + c),
            _ => None,
        });
        Self {
            prompt_tokens: prompt,
            completion_tokens: completion,
            total_tokens: total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prompt_tokens.is_none() && self.completion_tokens.is_none() && self.total_tokens.is_none()
    }
}

/// Canonical successful generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIResponse {
    pub text: String,
    pub usage: Option<TokenUsage>,
    pub latency_ms: u64,
    /// Id of the configured provider that served the request
    pub provider_id: String,
    /// Backend-specific extras (model, finish reason, request id, ...)
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Raw payload shapes, one per backend family
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// OpenAI chat-completions body
    OpenAIChat(serde_json::Value),
    /// OpenRouter body (OpenAI-like, usage optional, routed model and upstream provider)
    OpenRouter(serde_json::Value),
    /// Anthropic messages body
    Anthropic(serde_json::Value),
    /// Gemini `generateContent` body
    Gemini(serde_json::Value),
    /// Already-extracted text from an in-process or blocking SDK backend
    Text {
        text: String,
        usage: Option<TokenUsage>,
    },
}

impl RawPayload {
    /// Short name of the payload family, used for logging
    pub fn kind(&self) -> &'static str {
        match self {
            RawPayload::OpenAIChat(_) => "openai_chat",
            RawPayload::OpenRouter(_) => "openrouter",
            RawPayload::Anthropic(_) => "anthropic",
            RawPayload::Gemini(_) => "gemini",
            RawPayload::Text { .. } => "text",
        }
    }
}

/// Successful adapter reply before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RawSuccess {
    pub payload: RawPayload,
    /// HTTP status of the reply, if the backend is HTTP based
    pub status: Option<u16>,
    /// Upstream request id taken from response headers
    pub request_id: Option<String>,
}

impl RawSuccess {
    pub fn new(payload: RawPayload) -> Self {
        Self {
            payload,
            status: None,
            request_id: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(RawPayload::Text {
            text: text.into(),
            usage: None,
        })
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}
