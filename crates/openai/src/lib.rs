//! Language-model collaborator: a thin client for an OpenAI-compatible
//! chat-completions endpoint, plus the analysis prompt this service sends.
//!
//! The model's answer is treated as opaque free text here; tolerant parsing
//! of the JSON it is supposed to contain lives in `dermalens-core`.

pub mod client;
pub mod config;
pub mod prompt;

pub use client::{ChatApiError, ChatClient, ChatCompletion, ChatCompletions};
pub use config::OpenAiConfig;
