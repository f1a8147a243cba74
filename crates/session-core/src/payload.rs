//! Session payload serialization

use serde_json::{Map, Value};

use crate::error::StoreError;

/// Application-owned session data: string keys to arbitrary JSON values.
pub type SessionPayload = Map<String, Value>;

pub fn encode_payload(payload: &SessionPayload) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(payload).map_err(|e| StoreError::CorruptPayload(e.to_string()))
}

/// Decode a stored payload. Anything other than a JSON object is corrupt.
pub fn decode_payload(bytes: &[u8]) -> Result<SessionPayload, StoreError> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::CorruptPayload(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
        Err(e) => Err(StoreError::CorruptPayload(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
