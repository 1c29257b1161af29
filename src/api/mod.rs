// src/api/mod.rs

pub mod error;
pub mod handlers;
pub mod router;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use router::create_router;
pub use types::{HelloResponse, SubmitRequest, SubmitResponse};
