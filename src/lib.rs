// src/lib.rs

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod persona;
pub mod relay;
pub mod state;

pub use error::{ErrorKind, RelayError, Result};
