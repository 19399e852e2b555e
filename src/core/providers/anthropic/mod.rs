//! Anthropic Provider
//!
//! Messages API with `x-api-key` authentication and a pinned `anthropic-version`.
//!
//! Documentation: https://docs.anthropic.com/en/api/messages

pub mod config;
pub mod models;
pub mod provider;

pub use config::AnthropicConfig;
pub use models::{AnthropicContentBlock, AnthropicMessagesRequest, AnthropicMessagesResponse};
pub use provider::AnthropicProvider;
