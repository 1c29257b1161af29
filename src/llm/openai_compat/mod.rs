// src/llm/openai_compat/mod.rs
// Shared OpenAI-compatible request/response types

mod request;
mod response;

pub use request::ChatRequest;
pub use response::{ChatResponse, extract_error_message, parse_chat_response};
