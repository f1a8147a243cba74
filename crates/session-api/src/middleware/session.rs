//! Server-side session middleware
//!
//! Inbound: the signed cookie is opened and the referenced payload is loaded
//! from the store into a [`Session`] placed in the request extensions.
//! Outbound: a non-empty session is written back with a fresh TTL and a new
//! cookie; a session that existed but was emptied is deleted and the cookie
//! cleared; otherwise nothing happens.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, header::InvalidHeaderValue, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use session_core::{Session, SessionStore};
use session_security::{SessionCookieCodec, SessionCookieError};
use session_shared::SessionSettings;
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;

/// Process-wide session policy plus the store it persists to.
pub struct SessionManager<S> {
    store: Arc<S>,
    codec: SessionCookieCodec,
}

/// What the inbound phase learned, handed to the outbound phase.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Identifier from a verified cookie. `None` for new or untrusted cookies.
    pub session_key: Option<Uuid>,
    /// No verified cookie came in, so an empty session is never deleted.
    pub empty_initial_session: bool,
    pub session: Session,
}

impl SessionContext {
    fn fresh() -> Self {
        Self {
            session_key: None,
            empty_initial_session: true,
            session: Session::default(),
        }
    }
}

impl<S: SessionStore> SessionManager<S> {
    /// Fails when the configured cookie attributes cannot form a header value.
    pub fn new(store: Arc<S>, settings: &SessionSettings) -> Result<Self, InvalidHeaderValue> {
        let codec = SessionCookieCodec::new(settings);
        HeaderValue::from_str(&codec.clear())?;
        Ok(Self { store, codec })
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn codec(&self) -> &SessionCookieCodec {
        &self.codec
    }

    /// Inbound phase.
    ///
    /// Cookie problems degrade to an empty session and are not reported;
    /// store failures are.
    pub async fn load(&self, headers: &HeaderMap) -> Result<SessionContext, ApiError> {
        let cookies = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok());

        let session_key = match self.codec.open(cookies) {
            Ok(session_key) => session_key,
            Err(SessionCookieError::CookieAbsent) => return Ok(SessionContext::fresh()),
            Err(e) => {
                debug!("Ignoring session cookie: {}", e);
                return Ok(SessionContext::fresh());
            }
        };

        let payload = self.store.get(&session_key.to_string()).await?;
        if payload.is_none() {
            debug!("Session cookie references no stored session");
        }

        Ok(SessionContext {
            session_key: Some(session_key),
            empty_initial_session: false,
            session: Session::new(payload.unwrap_or_default()),
        })
    }

    /// Outbound phase: persist, refresh or tear down, and set the cookie.
    pub async fn commit(
        &self,
        context: SessionContext,
        headers: &mut HeaderMap,
    ) -> Result<(), ApiError> {
        let session_key = context.session_key.unwrap_or_else(Uuid::new_v4);
        let store_key = session_key.to_string();

        if !context.session.is_empty() {
            let payload = context.session.snapshot();
            self.store
                .set(&store_key, &payload, self.codec.max_age())
                .await?;
            append_set_cookie(headers, &self.codec.issue(session_key))?;
            debug!(
                "Session saved ({} keys, {})",
                payload.len(),
                if context.empty_initial_session { "created" } else { "refreshed" }
            );
        } else if !context.empty_initial_session {
            self.store.delete(&store_key).await?;
            append_set_cookie(headers, &self.codec.clear())?;
            debug!("Session destroyed");
        }

        Ok(())
    }
}

fn append_set_cookie(headers: &mut HeaderMap, cookie: &str) -> Result<(), ApiError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| ApiError::InternalError(format!("Invalid Set-Cookie header: {}", e)))?;
    headers.append(header::SET_COOKIE, value);
    Ok(())
}

/// Session middleware, installed with `axum::middleware::from_fn_with_state`.
///
/// If the handler panics or its future is dropped, the outbound phase never
/// runs and nothing is written.
pub async fn session_middleware<S: SessionStore>(
    State(manager): State<Arc<SessionManager<S>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = manager.load(request.headers()).await?;
    request.extensions_mut().insert(context.session.clone());

    let mut response = next.run(request).await;

    manager.commit(context, response.headers_mut()).await?;
    Ok(response)
}
