//! End-to-end flows through the session routes backed by the in-memory store.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    middleware,
    response::Response,
    routing::get,
    Extension, Router,
};
use serde_json::{json, Value};
use session_api::{build_router, session_middleware, AppState, SessionManager};
use session_core::{Session, SessionStore};
use session_infrastructure::MemorySessionStore;
use session_security::SessionCookieCodec;
use session_shared::{SameSite, SessionSettings};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "flow-test-secret";

fn app_with(store: Arc<MemorySessionStore>, settings: &SessionSettings) -> Router {
    let state = AppState {
        sessions: Arc::new(SessionManager::new(store, settings).unwrap()),
        app_name: "session-test".to_string(),
    };
    build_router(state, "v1")
}

fn app(store: Arc<MemorySessionStore>) -> Router {
    app_with(store, &SessionSettings::with_secret(SECRET))
}

fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .map(|value| value.to_str().unwrap().to_string())
}

fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().to_string()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_first_write_issues_cookie_and_stores_payload() {
    let store = Arc::new(MemorySessionStore::new());
    let response = app(store.clone())
        .oneshot(request(
            Method::POST,
            "/api/v1/session",
            None,
            Some(json!({ "user_id": 42 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = set_cookie(&response).expect("session cookie");
    assert!(set_cookie.starts_with("darkstar="));
    assert!(set_cookie.ends_with("; Path=/; Max-Age=1209600; httponly; samesite=lax"));

    let id = SessionCookieCodec::new(&SessionSettings::with_secret(SECRET))
        .open([cookie_pair(&set_cookie).as_str()])
        .unwrap();
    let stored = store.get(&id.to_string()).await.unwrap().unwrap();
    assert_eq!(stored.get("user_id"), Some(&json!(42)));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_session_survives_across_requests_until_cleared() {
    let store = Arc::new(MemorySessionStore::new());
    let app = app(store.clone());

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/session",
            None,
            Some(json!({ "cart": ["apple"] })),
        ))
        .await
        .unwrap();
    let cookie = cookie_pair(&set_cookie(&response).unwrap());

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/api/v1/session", Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    // Read-only requests still slide the expiry forward.
    assert!(set_cookie(&response).is_some());
    let body = json_body(response).await;
    assert_eq!(body["data"]["cart"], json!(["apple"]));

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/session",
            Some(&cookie),
            Some(json!({ "user_id": 7 })),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"], json!({ "cart": ["apple"], "user_id": 7 }));
    assert_eq!(store.len(), 1);

    let response = app
        .oneshot(request(Method::DELETE, "/api/v1/session", Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = set_cookie(&response).unwrap();
    assert!(cleared.starts_with("darkstar=null; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0"));
    let body = json_body(response).await;
    assert_eq!(body["message"], "Session cleared");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_non_object_update_is_rejected_without_cookie() {
    let store = Arc::new(MemorySessionStore::new());
    let response = app(store.clone())
        .oneshot(request(
            Method::POST,
            "/api/v1/session",
            None,
            Some(json!([1, 2, 3])),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(set_cookie(&response).is_none());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_configured_cookie_attributes() {
    let mut settings = SessionSettings::with_secret(SECRET);
    settings.cookie_name = "sid".to_string();
    settings.max_age = 3600;
    settings.same_site = SameSite::Strict;
    settings.https_only = true;
    settings.domain = Some("example.org".to_string());

    let store = Arc::new(MemorySessionStore::new());
    let response = app_with(store, &settings)
        .oneshot(request(
            Method::POST,
            "/api/v1/session",
            None,
            Some(json!({ "theme": "dark" })),
        ))
        .await
        .unwrap();

    let set_cookie = set_cookie(&response).unwrap();
    assert!(set_cookie.starts_with("sid="));
    assert!(set_cookie.ends_with(
        "; Path=/; Max-Age=3600; httponly; samesite=strict; secure; Domain=example.org"
    ));
}

#[tokio::test]
async fn test_health_routes_skip_the_session_layer() {
    let store = Arc::new(MemorySessionStore::new());
    let app = app(store);

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).is_none());
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");

    let response = app
        .oneshot(request(Method::GET, "/health/ready", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_panicking_handler_writes_nothing() {
    let store = Arc::new(MemorySessionStore::new());
    let manager = Arc::new(
        SessionManager::new(store.clone(), &SessionSettings::with_secret(SECRET)).unwrap(),
    );
    let app = Router::new()
        .route(
            "/boom",
            get(|Extension(session): Extension<Session>| async move {
                session.insert("user_id", 42).unwrap();
                if session.contains_key("user_id") {
                    panic!("handler failed after mutating the session");
                }
                "unreachable"
            }),
        )
        .layer(middleware::from_fn_with_state(
            manager,
            session_middleware::<MemorySessionStore>,
        ));

    let outcome = tokio::spawn(async move {
        app.oneshot(request(Method::GET, "/boom", None, None)).await
    })
    .await;

    assert!(outcome.unwrap_err().is_panic());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_unknown_identifier_starts_empty_and_reuses_id() {
    let store = Arc::new(MemorySessionStore::new());
    let id = Uuid::new_v4();
    let issued = SessionCookieCodec::new(&SessionSettings::with_secret(SECRET)).issue(id);

    let response = app(store.clone())
        .oneshot(request(
            Method::POST,
            "/api/v1/session",
            Some(&cookie_pair(&issued)),
            Some(json!({ "step": 1 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"], json!({ "step": 1 }));
    assert!(store.get(&id.to_string()).await.unwrap().is_some());
}
