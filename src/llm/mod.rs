// src/llm/mod.rs
// Chat completion client (OpenAI-compatible)

pub mod http_client;
pub mod logging;
pub mod openai_compat;
pub mod provider;
pub mod types;

pub use provider::LlmClient;
pub use provider::openai::OpenAiClient;
pub use types::{ChatResult, Message, Role, Usage};
