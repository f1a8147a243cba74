//! Configuration management

use std::fmt;

use config::{Config, Environment, File};
use serde::Deserialize;
use validator::Validate;

use crate::constants::{
    DEFAULT_API_VERSION, DEFAULT_COOKIE_NAME, DEFAULT_REDIS_MAX_CONNECTIONS, DEFAULT_REDIS_URL,
    DEFAULT_SESSION_MAX_AGE, ENV_LOG_LEVEL, ENV_SIGNING_KEY,
};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub app: AppSettings,
    #[validate(nested)]
    pub session: SessionSettings,
    pub store: StoreSettings,
    #[validate(nested)]
    pub redis: RedisSettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    #[validate(length(min = 1, message = "api_version must not be empty"))]
    pub api_version: String,
}

/// Cookie and signing policy for the session middleware.
///
/// Read-only after startup; shared behind an `Arc` by the middleware.
#[derive(Deserialize, Clone, Validate)]
pub struct SessionSettings {
    #[validate(length(min = 1, message = "session signing secret must be set"))]
    pub secret_key: String,
    #[validate(length(min = 1, message = "cookie_name must not be empty"))]
    pub cookie_name: String,
    /// Seconds. Used for the signature age, the cookie `Max-Age` and the store TTL.
    #[validate(range(min = 1, message = "max_age must be at least one second"))]
    pub max_age: u64,
    pub same_site: SameSite,
    pub https_only: bool,
    #[validate(length(min = 1, message = "domain must not be empty when set"))]
    pub domain: Option<String>,
}

impl fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSettings")
            .field("secret_key", &"<redacted>")
            .field("cookie_name", &self.cookie_name)
            .field("max_age", &self.max_age)
            .field("same_site", &self.same_site)
            .field("https_only", &self.https_only)
            .field("domain", &self.domain)
            .finish()
    }
}

impl SessionSettings {
    /// Settings with the default cookie policy and the given secret.
    pub fn with_secret(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            max_age: DEFAULT_SESSION_MAX_AGE,
            same_site: SameSite::default(),
            https_only: false,
            domain: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "strict",
            SameSite::Lax => "lax",
            SameSite::None => "none",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    pub backend: StoreBackend,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Redis,
    Memory,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct RedisSettings {
    #[validate(length(min = 1))]
    pub url: String,
    #[validate(range(min = 1))]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
    pub directory: Option<String>,
}

impl AppConfig {
    /// Load from defaults, `config/default`, `config/<APP_ENV>` and the environment.
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .set_override_option("session.secret_key", std::env::var(ENV_SIGNING_KEY).ok())?
            .set_override_option("log.level", std::env::var(ENV_LOG_LEVEL).ok())?;
        Self::from_config(builder.build()?)
    }

    /// Builder pre-populated with every default, ready for additional sources.
    pub fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, AppError> {
        Ok(Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "session-server")?
            .set_default("app.api_version", DEFAULT_API_VERSION)?
            .set_default("session.secret_key", "")?
            .set_default("session.cookie_name", DEFAULT_COOKIE_NAME)?
            .set_default("session.max_age", DEFAULT_SESSION_MAX_AGE as i64)?
            .set_default("session.same_site", "lax")?
            .set_default("session.https_only", false)?
            .set_default("store.backend", "redis")?
            .set_default("redis.url", DEFAULT_REDIS_URL)?
            .set_default("redis.max_connections", DEFAULT_REDIS_MAX_CONNECTIONS as i64)?
            .set_default("log.level", "info")?
            .set_default("log.json", true)?)
    }

    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }
}
