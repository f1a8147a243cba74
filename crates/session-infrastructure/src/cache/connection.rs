//! Redis connection pool

use deadpool_redis::{Config, CreatePoolError, Pool, PoolConfig, Runtime};
use session_shared::config::RedisSettings;

pub fn create_pool(settings: &RedisSettings) -> Result<Pool, CreatePoolError> {
    let mut config = Config::from_url(settings.url.clone());
    config.pool = Some(PoolConfig::new(settings.max_connections as usize));
    config.create_pool(Some(Runtime::Tokio1))
}
