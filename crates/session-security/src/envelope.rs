//! Session envelope: `base64(json({"_cssid": "<uuid>"}))`

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use session_shared::constants::COOKIE_SESSION_ID_FIELD;
use uuid::Uuid;

use crate::error::SessionCookieError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEnvelope {
    pub session_id: Uuid,
}

impl SessionEnvelope {
    pub fn new(session_id: Uuid) -> Self {
        Self { session_id }
    }

    pub fn encode(&self) -> Vec<u8> {
        let body = json!({ COOKIE_SESSION_ID_FIELD: self.session_id.to_string() });
        STANDARD.encode(body.to_string()).into_bytes()
    }

    pub fn decode(encoded: &[u8]) -> Result<Self, SessionCookieError> {
        let raw = STANDARD
            .decode(encoded)
            .map_err(|e| SessionCookieError::MalformedEnvelope(e.to_string()))?;
        let body: Value = serde_json::from_slice(&raw)
            .map_err(|e| SessionCookieError::MalformedEnvelope(e.to_string()))?;
        let session_id = body
            .get(COOKIE_SESSION_ID_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                SessionCookieError::MalformedEnvelope(format!(
                    "missing {} field",
                    COOKIE_SESSION_ID_FIELD
                ))
            })?;
        let session_id = Uuid::parse_str(session_id)
            .map_err(|e| SessionCookieError::MalformedEnvelope(e.to_string()))?;
        Ok(Self { session_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_shape() {
        let id = Uuid::parse_str("0b7e6c1a-32f4-4c4e-9d43-7f1f0c2b9a11").unwrap();
        let encoded = SessionEnvelope::new(id).encode();
        let raw = STANDARD.decode(&encoded).unwrap();
        let body: Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(body, json!({ "_cssid": "0b7e6c1a-32f4-4c4e-9d43-7f1f0c2b9a11" }));
        assert_eq!(SessionEnvelope::decode(&encoded).unwrap().session_id, id);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        let cases = [
            "not base64!".to_string(),
            STANDARD.encode("not json"),
            STANDARD.encode(r#"["_cssid"]"#),
            STANDARD.encode(r#"{"other": "x"}"#),
            STANDARD.encode(r#"{"_cssid": 42}"#),
            STANDARD.encode(r#"{"_cssid": "not-a-uuid"}"#),
        ];
        for case in cases {
            assert!(
                matches!(
                    SessionEnvelope::decode(case.as_bytes()),
                    Err(SessionCookieError::MalformedEnvelope(_))
                ),
                "accepted {}",
                case
            );
        }
    }
}
