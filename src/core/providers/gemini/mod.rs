//! Google Gemini Provider
//!
//! `generateContent` endpoint with `x-goog-api-key` authentication.
//!
//! Documentation: https://ai.google.dev/api/generate-content

pub mod config;
pub mod models;
pub mod provider;

pub use config::GeminiConfig;
pub use models::{GeminiGenerateRequest, GeminiGenerateResponse};
pub use provider::GeminiProvider;
