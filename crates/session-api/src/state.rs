use std::sync::Arc;

use crate::middleware::SessionManager;

/// Shared state for the session routes.
pub struct AppState<S> {
    pub sessions: Arc<SessionManager<S>>,
    pub app_name: String,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            app_name: self.app_name.clone(),
        }
    }
}
