//! Session store trait (port)

use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::payload::SessionPayload;

/// Backend holding session payloads between requests, keyed by session identifier.
///
/// Writes are last-writer-wins; there is no locking across requests that share
/// an identifier.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// `Ok(None)` when the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<SessionPayload>, StoreError>;

    /// Overwrite `key` and reset its time to live.
    async fn set(&self, key: &str, payload: &SessionPayload, ttl: Duration) -> Result<(), StoreError>;

    /// Idempotent: deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Readiness probe.
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
