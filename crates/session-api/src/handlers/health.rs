use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use session_core::SessionStore;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

pub async fn health_check<S: SessionStore>(
    State(state): State<AppState<S>>,
) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            service: state.app_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Ready once the session store answers.
pub async fn readiness_check<S: SessionStore>(
    State(state): State<AppState<S>>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .store()
        .health_check()
        .await
        .map_err(|e| ApiError::ServiceUnavailable(e.to_string()))?;
    Ok(StatusCode::OK)
}
