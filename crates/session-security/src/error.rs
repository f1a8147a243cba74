//! Signature and cookie errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Bad signature")]
    BadSignature,

    #[error("Signature expired: age {age}s, max age {max_age}s")]
    SignatureExpired { age: i64, max_age: u64 },
}

/// Failures while reading the session cookie.
///
/// All of these are recovered by the middleware as "no session".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionCookieError {
    #[error("Session cookie absent")]
    CookieAbsent,

    #[error("Malformed session envelope: {0}")]
    MalformedEnvelope(String),

    #[error(transparent)]
    Signature(#[from] SignatureError),
}
