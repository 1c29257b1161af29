// src/relay.rs
// Core relay flow: validate, pick persona, one completion call, first choice out

use tracing::{info, instrument};

use crate::api::types::SubmitRequest;
use crate::error::{RelayError, Result};
use crate::llm::Message;
use crate::persona::Persona;
use crate::state::AppState;

/// A submission that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub text: String,
    pub voice_id: String,
}

impl Submission {
    /// Both fields must be present and non-empty. Text is forwarded verbatim.
    pub fn validate(request: SubmitRequest) -> Result<Self> {
        let text = request
            .text
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RelayError::validation("text is required"))?;
        let voice_id = request
            .voice_id
            .filter(|v| !v.is_empty())
            .ok_or_else(|| RelayError::validation("voiceId is required"))?;
        Ok(Self { text, voice_id })
    }

    pub fn persona(&self) -> Persona {
        Persona::from_voice_id(&self.voice_id)
    }
}

/// The two-turn transcript sent upstream: persona prompt, then the user's text
pub fn build_messages(system_prompt: &str, text: &str) -> Vec<Message> {
    vec![Message::system(system_prompt), Message::user(text)]
}

/// Run one submission end to end and return the reply text.
#[instrument(skip_all, fields(persona, text_len))]
pub async fn relay(state: &AppState, request: SubmitRequest) -> Result<String> {
    let submission = Submission::validate(request)?;
    let persona = submission.persona();

    let span = tracing::Span::current();
    span.record("persona", tracing::field::display(persona));
    span.record("text_len", submission.text.len());

    let prompt = state.personas.prompt_for(persona);
    let messages = build_messages(prompt, &submission.text);

    info!(model = %state.llm.model_name(), max_tokens = state.max_tokens, "Relaying submission");
    let result = state.llm.chat(messages, state.max_tokens).await?;
    result.into_text()
}
