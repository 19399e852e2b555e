//! OpenRouter wire models
//!
//! Requests use the OpenAI shape. Responses add the upstream `provider` that
//! served the routed model, and usage is frequently omitted.

use serde::Deserialize;

use crate::core::providers::openai::models::{OpenAIChoice, OpenAIUsage};

#[derive(Debug, Clone, Deserialize)]
pub struct OpenRouterChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    /// Model actually used after routing
    #[serde(default)]
    pub model: Option<String>,
    /// Upstream provider name
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub choices: Vec<OpenAIChoice>,
    #[serde(default)]
    pub usage: Option<OpenAIUsage>,
}
