// src/llm/provider/mod.rs
// Provider abstraction: the relay only needs "messages in, first completion out"

use async_trait::async_trait;

use crate::error::Result;
use crate::llm::{ChatResult, Message};

pub mod openai;

/// Trait for completion clients. Handlers depend on this, never on a concrete provider.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one chat completion request
    async fn chat(&self, messages: Vec<Message>, max_tokens: u32) -> Result<ChatResult>;

    /// Model identifier sent upstream
    fn model_name(&self) -> String;
}
