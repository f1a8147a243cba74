//! Session cookie header values

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use session_shared::constants::{CLEARED_COOKIE_EXPIRES, CLEARED_COOKIE_VALUE};
use session_shared::SessionSettings;

use crate::error::SessionCookieError;

#[derive(Debug, Clone)]
pub struct CookieCodec {
    cookie_name: String,
    max_age: u64,
    security_flags: String,
    domain: Option<String>,
}

impl CookieCodec {
    pub fn new(settings: &SessionSettings) -> Self {
        let mut security_flags = format!("httponly; samesite={}", settings.same_site);
        // Secure cookies only travel over HTTPS.
        if settings.https_only {
            security_flags.push_str("; secure");
        }
        Self {
            cookie_name: settings.cookie_name.clone(),
            max_age: settings.max_age,
            security_flags,
            domain: settings.domain.clone(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn security_flags(&self) -> &str {
        &self.security_flags
    }

    /// `Set-Cookie` value carrying a signed envelope.
    pub fn build(&self, signed: &[u8]) -> String {
        let cookie = format!(
            "{}={}; Path=/; Max-Age={}; {}",
            self.cookie_name,
            URL_SAFE_NO_PAD.encode(signed),
            self.max_age,
            self.security_flags
        );
        self.with_domain(cookie)
    }

    /// `Set-Cookie` value telling the client to drop the session cookie.
    pub fn build_clear(&self) -> String {
        let cookie = format!(
            "{}={}; Path=/; Expires={}; Max-Age=0; {}",
            self.cookie_name, CLEARED_COOKIE_VALUE, CLEARED_COOKIE_EXPIRES, self.security_flags
        );
        self.with_domain(cookie)
    }

    /// Extract the signed envelope from the request's `Cookie` headers.
    ///
    /// The first pair with a matching name wins.
    pub fn parse<'a, I>(&self, cookie_headers: I) -> Result<Vec<u8>, SessionCookieError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let value = cookie_headers
            .into_iter()
            .flat_map(|header| header.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| name.trim() == self.cookie_name)
            .map(|(_, value)| value.trim().trim_matches('"'))
            .ok_or(SessionCookieError::CookieAbsent)?;

        URL_SAFE_NO_PAD
            .decode(value)
            .map_err(|e| SessionCookieError::MalformedEnvelope(e.to_string()))
    }

    fn with_domain(&self, cookie: String) -> String {
        match &self.domain {
            Some(domain) => format!("{}; Domain={}", cookie, domain),
            None => cookie,
        }
    }
}
