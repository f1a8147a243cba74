//! Cache module (session store adapters)

pub mod connection;
pub mod memory;
pub mod redis;

pub use connection::create_pool;
pub use memory::MemorySessionStore;
pub use self::redis::RedisSessionStore;
