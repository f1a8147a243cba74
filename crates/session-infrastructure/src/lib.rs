//! # Session Infrastructure
//! 
//! Session store implementations (adapters): Redis and in-process memory.

pub mod cache;

pub use cache::{create_pool, MemorySessionStore, RedisSessionStore};
