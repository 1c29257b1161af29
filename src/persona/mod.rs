// src/persona/mod.rs
// Persona system: maps a client voice id to the system prompt that shapes the reply.

pub mod professor;
pub mod sophia;

use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::error::{RelayError, Result};

pub use professor::PROFESSOR_PERSONA_PROMPT;
pub use sophia::SOPHIA_PERSONA_PROMPT;

/// Voice id reserved for the professor persona
pub const PROFESSOR_VOICE_ID: &str = "TGQoVZu1ti5oWoox4wx4";

/// Known personas. `Sophia` is the fallback for any voice without its own overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Persona {
    Professor,
    #[default]
    Sophia,
}

impl Persona {
    pub const ALL: [Persona; 2] = [Persona::Professor, Persona::Sophia];

    /// Resolve a client voice id. Total: unknown ids get the default persona.
    pub fn from_voice_id(voice_id: &str) -> Self {
        match voice_id {
            PROFESSOR_VOICE_ID => Persona::Professor,
            _ => Persona::default(),
        }
    }

    /// The voice id that selects this persona, if it has a reserved one.
    pub fn voice_id(&self) -> Option<&'static str> {
        match self {
            Persona::Professor => Some(PROFESSOR_VOICE_ID),
            Persona::Sophia => None,
        }
    }

    /// Built-in system prompt for this persona.
    pub fn prompt(&self) -> &'static str {
        match self {
            Persona::Professor => PROFESSOR_PERSONA_PROMPT,
            Persona::Sophia => SOPHIA_PERSONA_PROMPT,
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Persona::Professor => "professor",
                Persona::Sophia => "sophia",
            }
        )
    }
}

impl std::str::FromStr for Persona {
    type Err = RelayError;

    /// Parse a persona by name (not by voice id).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "professor" => Ok(Persona::Professor),
            "sophia" | "default" => Ok(Persona::Sophia),
            other => Err(RelayError::validation(format!("unknown persona: {other}"))),
        }
    }
}

/// Prompt text per persona, fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaPrompts {
    professor: String,
    default: String,
}

/// On-disk shape of a persona override file. Missing keys keep the built-in text.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PersonaFile {
    professor: Option<String>,
    default: Option<String>,
}

impl Default for PersonaPrompts {
    fn default() -> Self {
        Self {
            professor: PROFESSOR_PERSONA_PROMPT.to_string(),
            default: SOPHIA_PERSONA_PROMPT.to_string(),
        }
    }
}

impl PersonaPrompts {
    /// Parse overrides from TOML text on top of the built-in prompts.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: PersonaFile = toml::from_str(content)
            .map_err(|e| RelayError::config(format!("invalid persona file: {e}")))?;

        let mut prompts = Self::default();
        if let Some(text) = file.professor {
            prompts.professor = non_blank("professor", text)?;
        }
        if let Some(text) = file.default {
            prompts.default = non_blank("default", text)?;
        }
        Ok(prompts)
    }

    /// Load overrides from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RelayError::config(format!("cannot read persona file {}: {e}", path.display()))
        })?;
        let prompts = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "Loaded persona overrides");
        Ok(prompts)
    }

    pub fn prompt_for(&self, persona: Persona) -> &str {
        match persona {
            Persona::Professor => &self.professor,
            Persona::Sophia => &self.default,
        }
    }
}

fn non_blank(key: &str, text: String) -> Result<String> {
    if text.trim().is_empty() {
        return Err(RelayError::config(format!("persona '{key}' has an empty prompt")));
    }
    Ok(text)
}

/// Select the built-in prompt for a voice id.
pub fn select_prompt(voice_id: &str) -> &'static str {
    Persona::from_voice_id(voice_id).prompt()
}
