//! Timestamp signer
//!
//! Token layout: `<payload>.<timestamp>.<tag>`, where `timestamp` is the
//! big-endian seconds since the epoch (leading zero bytes stripped) and `tag`
//! is HMAC-SHA256 over `<payload>.<timestamp>`. Both are URL-safe base64
//! without padding.

use std::fmt;
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::SignatureError;

type HmacSha256 = Hmac<Sha256>;

const SEPARATOR: u8 = b'.';

#[derive(Clone)]
pub struct TimestampSigner {
    key: Vec<u8>,
}

impl fmt::Debug for TimestampSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimestampSigner").finish_non_exhaustive()
    }
}

impl TimestampSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            key: secret.as_ref().to_vec(),
        }
    }

    /// Sign `payload` with the current time.
    pub fn sign(&self, payload: &[u8]) -> Vec<u8> {
        self.sign_at(payload, Utc::now().timestamp())
    }

    pub fn sign_at(&self, payload: &[u8], timestamp: i64) -> Vec<u8> {
        let mut message = Vec::with_capacity(payload.len() + 64);
        message.extend_from_slice(payload);
        message.push(SEPARATOR);
        message.extend_from_slice(encode_timestamp(timestamp).as_bytes());

        let tag = self.mac(&message).finalize().into_bytes();

        message.push(SEPARATOR);
        message.extend_from_slice(URL_SAFE_NO_PAD.encode(tag).as_bytes());
        message
    }

    /// Check the tag and the age of `signed`, returning the original payload.
    pub fn verify(&self, signed: &[u8], max_age: Duration) -> Result<Vec<u8>, SignatureError> {
        self.verify_at(signed, max_age, Utc::now().timestamp())
    }

    pub fn verify_at(
        &self,
        signed: &[u8],
        max_age: Duration,
        now: i64,
    ) -> Result<Vec<u8>, SignatureError> {
        let (message, tag) = split_last(signed).ok_or(SignatureError::BadSignature)?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag)
            .map_err(|_| SignatureError::BadSignature)?;

        // Constant-time comparison.
        self.mac(message)
            .verify_slice(&tag)
            .map_err(|_| SignatureError::BadSignature)?;

        let (payload, timestamp) = split_last(message).ok_or(SignatureError::BadSignature)?;
        let timestamp = decode_timestamp(timestamp).ok_or(SignatureError::BadSignature)?;

        let age = now.saturating_sub(timestamp);
        let max_age = max_age.as_secs();
        if age < 0 || age as u64 > max_age {
            return Err(SignatureError::SignatureExpired { age, max_age });
        }

        Ok(payload.to_vec())
    }

    fn mac(&self, message: &[u8]) -> HmacSha256 {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.key)
            .expect("HMAC accepts keys of any length");
        mac.update(message);
        mac
    }
}

fn split_last(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = bytes.iter().rposition(|b| *b == SEPARATOR)?;
    Some((&bytes[..pos], &bytes[pos + 1..]))
}

fn encode_timestamp(timestamp: i64) -> String {
    let bytes = timestamp.max(0).to_be_bytes();
    let first = bytes
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(bytes.len() - 1);
    URL_SAFE_NO_PAD.encode(&bytes[first..])
}

fn decode_timestamp(encoded: &[u8]) -> Option<i64> {
    let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
    if bytes.is_empty() || bytes.len() > 8 {
        return None;
    }
    let value = bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    i64::try_from(value).ok()
}
