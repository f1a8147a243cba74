//! # Session API
//! 
//! Session middleware for axum, HTTP error mapping, and the session endpoints.
//!
//! Handlers reach the session through `Extension<Session>`, inserted by
//! [`middleware::session_middleware`] before the handler runs.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use middleware::{session_middleware, SessionContext, SessionManager};
pub use router::build_router;
pub use state::AppState;
