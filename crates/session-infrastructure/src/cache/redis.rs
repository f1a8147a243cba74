//! Redis-backed session store

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{redis::cmd, Connection, Pool};
use session_core::payload::{decode_payload, encode_payload};
use session_core::{SessionPayload, SessionStore, StoreError};
use tracing::{debug, error};

/// Stores each session as a JSON string under its identifier with `EX <ttl>`.
#[derive(Clone)]
pub struct RedisSessionStore {
    pool: Pool,
}

impl RedisSessionStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn connection(&self) -> Result<Connection, StoreError> {
        self.pool.get().await.map_err(|e| {
            error!("Redis pool error: {}", e);
            StoreError::StoreUnavailable(e.to_string())
        })
    }
}

/// Redis rejects `EX 0`, so sub-second TTLs round up to one second.
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

fn unavailable(e: impl std::fmt::Display) -> StoreError {
    error!("Redis command failed: {}", e);
    StoreError::StoreUnavailable(e.to_string())
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, key: &str) -> Result<Option<SessionPayload>, StoreError> {
        let mut conn = self.connection().await?;
        let value: Option<Vec<u8>> = cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;

        match value {
            Some(bytes) => decode_payload(&bytes).map(Some),
            None => {
                debug!("Session not found in redis");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, payload: &SessionPayload, ttl: Duration) -> Result<(), StoreError> {
        let value = encode_payload(payload)?;
        let mut conn = self.connection().await?;
        let _: () = cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds(ttl))
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        let removed: i64 = cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;
        debug!("Deleted session ({} key removed)", removed);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        let _: String = cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}
