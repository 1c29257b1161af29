// src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use axum::http::HeaderValue;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::{RelayError, Result};
use crate::llm::http_client::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::persona::PersonaPrompts;

pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Output cap for every completion. Not configurable through the API.
pub const MAX_OUTPUT_TOKENS: u32 = 200;

/// Placeholder values shipped in sample env files
const PLACEHOLDER_KEYS: &[&str] = &[
    "your_openai_api_key",
    "your-openai-api-key",
    "your_api_key",
    "your-api-key",
    "changeme",
    "sk-...",
];

/// True when the key is blank or obviously left over from a template.
pub fn is_placeholder_key(key: &str) -> bool {
    let key = key.trim();
    if key.is_empty() {
        return true;
    }
    let lower = key.to_lowercase();
    PLACEHOLDER_KEYS.contains(&lower.as_str()) || lower.starts_with("your_") || lower.starts_with("<")
}

#[derive(Clone)]
pub struct RelayConfig {
    /// Provider API key (OPENAI_API_KEY)
    pub api_key: String,
    /// CORS allow-list (FRONTEND_URL, comma-separated)
    pub allowed_origins: Vec<String>,
    /// Upstream model id (SOPHIA_MODEL)
    pub model: String,
    pub max_tokens: u32,
    /// Provider base URL without the /v1 path (OPENAI_BASE_URL)
    pub base_url: String,
    pub host: String,
    pub port: u16,
    /// Optional TOML file overriding persona wording (SOPHIA_PERSONA_FILE)
    pub persona_file: Option<PathBuf>,
    /// Upstream request timeout in seconds (SOPHIA_UPSTREAM_TIMEOUT)
    pub request_timeout_secs: u64,
}

// Manual impl so the API key never reaches logs
impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("allowed_origins", &self.allowed_origins)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("persona_file", &self.persona_file)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl RelayConfig {
    /// Load from the process environment (call once at startup)
    pub fn load() -> Self {
        info!("Loading environment configuration");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `load` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let allowed_origins = read("FRONTEND_URL")
            .map(|raw| parse_origins(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_FRONTEND_URL.to_string()]);

        let port = first_set(&read, &["SOPHIA_PORT", "PORT"])
            .map(|(key, v)| parse_or(key, &v, DEFAULT_PORT))
            .unwrap_or(DEFAULT_PORT);

        let request_timeout_secs = read("SOPHIA_UPSTREAM_TIMEOUT")
            .map(|v| parse_or("SOPHIA_UPSTREAM_TIMEOUT", &v, DEFAULT_REQUEST_TIMEOUT_SECS))
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            api_key: read("OPENAI_API_KEY").unwrap_or_default(),
            allowed_origins,
            model: read("SOPHIA_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: MAX_OUTPUT_TOKENS,
            base_url: read("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            host: read("SOPHIA_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            persona_file: read("SOPHIA_PERSONA_FILE").map(PathBuf::from),
            request_timeout_secs,
        }
    }

    /// Check everything that would make the relay start in a broken state
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::new();

        if self.api_key.trim().is_empty() {
            validation.add_error("OPENAI_API_KEY must be set");
        } else if is_placeholder_key(&self.api_key) {
            validation.add_error("OPENAI_API_KEY is still a placeholder value");
        }

        for origin in &self.allowed_origins {
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                validation.add_error(format!("FRONTEND_URL entry '{}' must start with http:// or https://", origin));
            } else if HeaderValue::from_str(origin).is_err() {
                validation.add_error(format!("FRONTEND_URL entry '{}' is not a valid origin", origin));
            } else if origin.ends_with('/') {
                validation.add_warning(format!(
                    "FRONTEND_URL entry '{}' has a trailing slash; browsers send origins without one",
                    origin
                ));
            }
        }

        if self.model.trim().is_empty() {
            validation.add_error("SOPHIA_MODEL must not be empty");
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            validation.add_error(format!("OPENAI_BASE_URL '{}' is not an http(s) URL", self.base_url));
        }

        if self.request_timeout_secs == 0 {
            validation.add_error("SOPHIA_UPSTREAM_TIMEOUT must be greater than zero");
        }

        if let Some(path) = &self.persona_file {
            if !path.exists() {
                validation.add_error(format!("SOPHIA_PERSONA_FILE {} does not exist", path.display()));
            }
        }

        validation
    }

    /// Validate and turn errors into a fatal configuration error
    pub fn into_validated(self) -> Result<Self> {
        let validation = self.validate();
        for warning in &validation.warnings {
            warn!("{}", warning);
        }
        if !validation.is_valid() {
            return Err(RelayError::config(validation.errors.join("; ")));
        }
        debug!(config = ?self, "Configuration validated");
        Ok(self)
    }

    /// Persona prompts: built-ins, or the override file if one is configured
    pub fn personas(&self) -> Result<PersonaPrompts> {
        match &self.persona_file {
            Some(path) => PersonaPrompts::load(path),
            None => Ok(PersonaPrompts::default()),
        }
    }

    /// Apply command-line listen overrides on top of the environment
    pub fn with_listen_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// First key in `keys` with a value, paired with that key
fn first_set<'k>(
    read: impl Fn(&str) -> Option<String>,
    keys: &[&'k str],
) -> Option<(&'k str, String)> {
    keys.iter().find_map(|key| read(key).map(|v| (*key, v)))
}

fn parse_or<T: FromStr>(key: &str, value: &str, default: T) -> T {
    match value.parse::<T>() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(key = key, value = value, "Config value failed to parse, using default");
            default
        }
    }
}

/// Configuration validation result
#[derive(Debug, Default)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ConfigValidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Format as a human-readable report
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            for err in &self.errors {
                lines.push(format!("  - {}", err));
            }
        }

        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            for warn in &self.warnings {
                lines.push(format!("  - {}", warn));
            }
        }

        if lines.is_empty() {
            "Configuration OK".to_string()
        } else {
            lines.join("\n")
        }
    }
}
