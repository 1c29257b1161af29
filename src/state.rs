// src/state.rs
// Shared, read-only handler state built once at startup

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::error::Result;
use crate::llm::{LlmClient, OpenAiClient};
use crate::persona::PersonaPrompts;

#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LlmClient>,
    pub personas: Arc<PersonaPrompts>,
    /// Output cap sent with every completion request
    pub max_tokens: u32,
}

impl AppState {
    pub fn new(llm: Arc<dyn LlmClient>, personas: PersonaPrompts, max_tokens: u32) -> Self {
        Self {
            llm,
            personas: Arc::new(personas),
            max_tokens,
        }
    }

    /// Production wiring: OpenAI client plus configured personas
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        let llm: Arc<dyn LlmClient> = Arc::new(OpenAiClient::from_config(config));
        Ok(Self::new(llm, config.personas()?, config.max_tokens))
    }
}
