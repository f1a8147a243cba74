//! Store errors

use thiserror::Error;

/// Failures of the backing store. Both are fatal for the request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Corrupt session payload: {0}")]
    CorruptPayload(String),

    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),
}
