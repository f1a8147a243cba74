//! Route table for the session service

use axum::{middleware, routing::get, Router};
use session_core::SessionStore;

use crate::handlers::{health, session};
use crate::middleware::session_middleware;
use crate::state::AppState;

pub fn build_router<S: SessionStore>(state: AppState<S>, api_version: &str) -> Router {
    // Public routes (no session)
    let public_routes = Router::new()
        .route("/health", get(health::health_check::<S>))
        .route("/health/ready", get(health::readiness_check::<S>));

    // Session routes
    let session_routes = Router::new()
        .route(
            "/session",
            get(session::show_session)
                .post(session::update_session)
                .delete(session::clear_session),
        )
        .layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            session_middleware::<S>,
        ));

    Router::new()
        .merge(public_routes)
        .nest(&format!("/api/{}", api_version), session_routes)
        .with_state(state)
}
