// src/config/mod.rs
// Configuration loaded once at startup and handed to the router

mod env;

pub use env::{
    ConfigValidation, DEFAULT_BASE_URL, DEFAULT_FRONTEND_URL, DEFAULT_HOST, DEFAULT_MODEL,
    DEFAULT_PORT, MAX_OUTPUT_TOKENS, RelayConfig, is_placeholder_key,
};
