//! # Session Core
//! 
//! Session payload, the per-request session handle, and the store trait (port).

pub mod error;
pub mod payload;
pub mod session;
pub mod store;

pub use error::StoreError;
pub use payload::SessionPayload;
pub use session::Session;
pub use store::SessionStore;
