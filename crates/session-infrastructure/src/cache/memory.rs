//! In-process session store
//!
//! Keeps serialized payloads in a `DashMap` with an absolute expiry. Expired
//! entries are dropped lazily on read or by `purge_expired`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use session_core::payload::{decode_payload, encode_payload};
use session_core::{SessionPayload, SessionStore, StoreError};

struct Entry {
    value: Vec<u8>,
    expires_at_ms: i64,
}

impl Entry {
    fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at_ms
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    map: DashMap<String, Entry>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live and not-yet-purged entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn purge_expired(&self) -> usize {
        let now_ms = now_ms();
        let before = self.map.len();
        self.map.retain(|_, entry| !entry.is_expired(now_ms));
        before - self.map.len()
    }

    /// Remove `key` only if it is still expired at `now_ms`. A write that
    /// landed after the expiry was observed is kept.
    fn evict_expired(&self, key: &str, now_ms: i64) -> bool {
        self.map
            .remove_if(key, |_, entry| entry.is_expired(now_ms))
            .is_some()
    }

    /// Write raw bytes, bypassing serialization.
    pub fn insert_raw(&self, key: impl Into<String>, value: Vec<u8>, ttl: Duration) {
        self.map.insert(
            key.into(),
            Entry {
                value,
                expires_at_ms: expiry_from(ttl),
            },
        );
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn expiry_from(ttl: Duration) -> i64 {
    let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    now_ms().saturating_add(ttl_ms)
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<SessionPayload>, StoreError> {
        let now_ms = now_ms();
        let Some(entry) = self.map.get(key) else {
            return Ok(None);
        };
        if entry.is_expired(now_ms) {
            drop(entry);
            self.evict_expired(key, now_ms);
            return Ok(None);
        }
        let value = entry.value.clone();
        drop(entry);
        decode_payload(&value).map(Some)
    }

    async fn set(&self, key: &str, payload: &SessionPayload, ttl: Duration) -> Result<(), StoreError> {
        let value = encode_payload(payload)?;
        self.insert_raw(key, value, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.map.remove(key);
        Ok(())
    }
}
