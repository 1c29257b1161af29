// src/api/router.rs
// Router composition: routes, CORS allow-list, request tracing

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{hello_handler, submit_handler};
use crate::error::{RelayError, Result};
use crate::state::AppState;

/// CORS for an explicit origin allow-list with credentials.
/// Methods and headers are mirrored from the preflight because a wildcard
/// is not allowed together with credentials.
pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|e| RelayError::config(format!("invalid CORS origin '{origin}': {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Create the relay router
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Result<Router> {
    let cors = cors_layer(allowed_origins)?;

    Ok(Router::new()
        .route("/api/test", get(hello_handler))
        .route("/submit", post(submit_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
