//! Signed session cookie: envelope, signer and cookie codec in one place.

use std::time::Duration;

use session_shared::SessionSettings;
use uuid::Uuid;

use crate::cookie::CookieCodec;
use crate::envelope::SessionEnvelope;
use crate::error::SessionCookieError;
use crate::signer::TimestampSigner;

#[derive(Debug, Clone)]
pub struct SessionCookieCodec {
    signer: TimestampSigner,
    cookie: CookieCodec,
    max_age: Duration,
}

impl SessionCookieCodec {
    pub fn new(settings: &SessionSettings) -> Self {
        Self {
            signer: TimestampSigner::new(&settings.secret_key),
            cookie: CookieCodec::new(settings),
            max_age: Duration::from_secs(settings.max_age),
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn cookie(&self) -> &CookieCodec {
        &self.cookie
    }

    /// `Set-Cookie` value referencing `session_id`.
    pub fn issue(&self, session_id: Uuid) -> String {
        let envelope = SessionEnvelope::new(session_id).encode();
        let signed = self.signer.sign(&envelope);
        self.cookie.build(&signed)
    }

    pub fn clear(&self) -> String {
        self.cookie.build_clear()
    }

    /// Recover the session identifier from the request's `Cookie` headers.
    ///
    /// Only an identifier carried by a valid, unexpired signature is returned.
    pub fn open<'a, I>(&self, cookie_headers: I) -> Result<Uuid, SessionCookieError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let signed = self.cookie.parse(cookie_headers)?;
        let envelope = self.signer.verify(&signed, self.max_age)?;
        Ok(SessionEnvelope::decode(&envelope)?.session_id)
    }
}
