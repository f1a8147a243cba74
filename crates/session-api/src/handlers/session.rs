//! Session endpoints: inspect, merge into, and clear the current session.

use axum::{Extension, Json};
use serde_json::Value;
use session_core::{Session, SessionPayload};
use tracing::info;

use crate::error::ApiError;
use crate::response::ApiResponse;

/// GET /api/{version}/session
pub async fn show_session(
    Extension(session): Extension<Session>,
) -> Json<ApiResponse<SessionPayload>> {
    Json(ApiResponse::success(session.snapshot()))
}

/// POST /api/{version}/session
///
/// Body must be a JSON object; its keys overwrite the session's.
pub async fn update_session(
    Extension(session): Extension<Session>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse<SessionPayload>>, ApiError> {
    let Value::Object(entries) = body else {
        return Err(ApiError::BadRequest(
            "Session update must be a JSON object".to_string(),
        ));
    };
    info!("Updating session with {} keys", entries.len());
    session.extend(entries);
    Ok(Json(ApiResponse::success(session.snapshot())))
}

/// DELETE /api/{version}/session
pub async fn clear_session(
    Extension(session): Extension<Session>,
) -> Json<ApiResponse<SessionPayload>> {
    session.clear();
    Json(ApiResponse::success_with_message(
        SessionPayload::new(),
        "Session cleared",
    ))
}
