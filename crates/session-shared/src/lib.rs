//! # Session Shared
//! 
//! Configuration, telemetry, and shared error types for the session layer.

pub mod constants;
pub mod telemetry;
pub mod config;
pub mod error;

pub use config::{AppConfig, SameSite, SessionSettings, StoreBackend};
pub use error::AppError;
