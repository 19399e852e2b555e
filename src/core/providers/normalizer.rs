//! Response normalization
//!
//! Pure mapping from each backend's raw success payload to the canonical
//! [`AIResponse`]. One branch per payload family.
//!
//! Required: non-empty generated text. Token usage is best-effort and stays
//! `None` where the backend omits it. `latency_ms` is left at zero; the
//! orchestrator stamps the measured value.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

use crate::core::providers::anthropic::AnthropicMessagesResponse;
use crate::core::providers::gemini::GeminiGenerateResponse;
use crate::core::providers::openai::{OpenAIChatResponse, OpenAIUsage};
use crate::core::providers::openrouter::OpenRouterChatResponse;
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::{AIResponse, RawPayload, RawSuccess, TokenUsage};

/// Extracted pieces before the canonical response is assembled
struct Extracted {
    text: Option<String>,
    usage: Option<TokenUsage>,
    metadata: HashMap<String, Value>,
}

/// Normalize a raw adapter success into the canonical response
pub fn normalize(raw: RawSuccess, provider_id: &str) -> Result<AIResponse, ProviderError> {
    let kind = raw.payload.kind();
    let extracted = match raw.payload {
        RawPayload::OpenAIChat(body) => from_openai(parse(body, provider_id, kind)?),
        RawPayload::OpenRouter(body) => from_openrouter(parse(body, provider_id, kind)?),
        RawPayload::Anthropic(body) => from_anthropic(parse(body, provider_id, kind)?),
        RawPayload::Gemini(body) => from_gemini(parse(body, provider_id, kind)?),
        RawPayload::Text { text, usage } => Extracted {
            text: Some(text),
            usage: usage.filter(|u| !u.is_empty()),
            metadata: HashMap::new(),
        },
    };

    let text = extracted
        .text
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| {
            ProviderError::invalid_response(
                provider_id,
                format!("{} payload contained no generated text", kind),
            )
        })?;

    let mut metadata = extracted.metadata;
    metadata.insert("payload".to_string(), Value::from(kind));
    if let Some(status) = raw.status {
        metadata.insert("status".to_string(), Value::from(status));
    }
    if let Some(request_id) = raw.request_id {
        metadata.insert("request_id".to_string(), Value::from(request_id));
    }

    Ok(AIResponse {
        text,
        usage: extracted.usage,
        latency_ms: 0,
        provider_id: provider_id.to_string(),
        metadata,
    })
}

fn parse<T: DeserializeOwned>(body: Value, provider_id: &str, kind: &str) -> Result<T, ProviderError> {
    serde_json::from_value(body).map_err(|e| {
        ProviderError::invalid_response(provider_id, format!("unexpected {} payload: {}", kind, e))
    })
}

fn insert_opt(metadata: &mut HashMap<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        metadata.insert(key.to_string(), Value::from(value));
    }
}

fn openai_usage(usage: Option<OpenAIUsage>) -> Option<TokenUsage> {
    usage
        .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens, u.total_tokens))
        .filter(|u| !u.is_empty())
}

fn from_openai(response: OpenAIChatResponse) -> Extracted {
    let mut metadata = HashMap::new();
    insert_opt(&mut metadata, "model", response.model);
    insert_opt(&mut metadata, "response_id", response.id);

    let choice = response.choices.into_iter().next();
    let text = choice.as_ref().and_then(|c| c.message.content.clone());
    insert_opt(
        &mut metadata,
        "finish_reason",
        choice.and_then(|c| c.finish_reason),
    );

    Extracted {
        text,
        usage: openai_usage(response.usage),
        metadata,
    }
}

fn from_openrouter(response: OpenRouterChatResponse) -> Extracted {
    let mut metadata = HashMap::new();
    insert_opt(&mut metadata, "model", response.model);
    insert_opt(&mut metadata, "response_id", response.id);
    insert_opt(&mut metadata, "upstream_provider", response.provider);

    let choice = response.choices.into_iter().next();
    let text = choice.as_ref().and_then(|c| c.message.content.clone());
    insert_opt(
        &mut metadata,
        "finish_reason",
        choice.and_then(|c| c.finish_reason),
    );

    Extracted {
        text,
        usage: openai_usage(response.usage),
        metadata,
    }
}

fn from_anthropic(response: AnthropicMessagesResponse) -> Extracted {
    let mut metadata = HashMap::new();
    insert_opt(&mut metadata, "model", response.model);
    insert_opt(&mut metadata, "response_id", response.id);
    insert_opt(&mut metadata, "finish_reason", response.stop_reason);

    let parts: Vec<String> = response
        .content
        .into_iter()
        .filter(|block| block.block_type == "text")
        .filter_map(|block| block.text)
        .collect();
    let text = (!parts.is_empty()).then(|| parts.join(""));

    let usage = response
        .usage
        .map(|u| TokenUsage::new(u.input_tokens, u.output_tokens, None))
        .filter(|u| !u.is_empty());

    Extracted {
        text,
        usage,
        metadata,
    }
}

fn from_gemini(response: GeminiGenerateResponse) -> Extracted {
    let mut metadata = HashMap::new();
    insert_opt(&mut metadata, "model", response.model_version);

    let candidate = response.candidates.into_iter().next();
    insert_opt(
        &mut metadata,
        "finish_reason",
        candidate.as_ref().and_then(|c| c.finish_reason.clone()),
    );
    let parts: Vec<String> = candidate
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    let text = (!parts.is_empty()).then(|| parts.join(""));

    let usage = response
        .usage_metadata
        .map(|u| {
            TokenUsage::new(
                u.prompt_token_count,
                u.candidates_token_count,
                u.total_token_count,
            )
        })
        .filter(|u| !u.is_empty());

    Extracted {
        text,
        usage,
        metadata,
    }
}
