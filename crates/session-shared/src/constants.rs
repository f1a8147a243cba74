//! Application-wide constants

/// Cookie name used when none is configured.
pub const DEFAULT_COOKIE_NAME: &str = "darkstar";
/// 14 days, in seconds.
pub const DEFAULT_SESSION_MAX_AGE: u64 = 14 * 24 * 60 * 60;
/// JSON field carrying the session identifier inside the cookie envelope.
pub const COOKIE_SESSION_ID_FIELD: &str = "_cssid";
/// Value written by the clearing cookie.
pub const CLEARED_COOKIE_VALUE: &str = "null";
pub const CLEARED_COOKIE_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:00 GMT";
pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
pub const DEFAULT_REDIS_MAX_CONNECTIONS: u32 = 16;

/// Legacy variable carrying the signing secret.
pub const ENV_SIGNING_KEY: &str = "SESSION_MIDDLEWARE_KEY";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
