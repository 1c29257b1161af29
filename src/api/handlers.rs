// src/api/handlers.rs
// HTTP handlers for the relay endpoints

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{error, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::types::{HelloResponse, SubmitRequest, SubmitResponse};
use crate::error::{ErrorKind, RelayError};
use crate::relay::relay;
use crate::state::AppState;

/// Liveness check
pub async fn hello_handler() -> Json<HelloResponse> {
    Json(HelloResponse::hello_world())
}

/// Relay a text + voice id to the completion provider
pub async fn submit_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> ApiResult<Json<SubmitResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(status = %rejection.status(), "Rejected submit body: {}", rejection.body_text());
        ApiError::from(RelayError::validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    })?;

    match relay(&state, request).await {
        Ok(sophia_response) => Ok(Json(SubmitResponse { sophia_response })),
        Err(e) => {
            match e.kind() {
                ErrorKind::Validation => warn!(error = %e, "Submit validation failed"),
                _ => error!(error = %e, "Submit failed"),
            }
            Err(e.into())
        }
    }
}
