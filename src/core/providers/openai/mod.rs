//! OpenAI Provider
//!
//! Chat-completions endpoint with bearer authentication.
//!
//! Documentation: https://platform.openai.com/docs/api-reference/chat

pub mod config;
pub mod models;
pub mod provider;

pub use config::OpenAIConfig;
pub use models::{OpenAIChatRequest, OpenAIChatResponse, OpenAIMessage, OpenAIUsage};
pub use provider::OpenAIProvider;
