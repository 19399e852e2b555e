//! OpenRouter Provider
//!
//! OpenRouter is a unified API that routes to many upstream models. It is
//! OpenAI API compatible; it additionally reads the `HTTP-Referer` and `X-Title`
//! headers to attribute traffic to the calling site.
//!
//! Documentation: https://openrouter.ai/docs

pub mod config;
pub mod models;
pub mod provider;

pub use config::OpenRouterConfig;
pub use models::OpenRouterChatResponse;
pub use provider::OpenRouterProvider;
