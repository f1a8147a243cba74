//! # Session Security
//! 
//! Cookie signing and encoding: timestamp signer, session envelope, cookie codec.

pub mod error;
pub mod signer;
pub mod envelope;
pub mod cookie;
pub mod codec;

pub use codec::SessionCookieCodec;
pub use cookie::CookieCodec;
pub use envelope::SessionEnvelope;
pub use error::{SessionCookieError, SignatureError};
pub use signer::TimestampSigner;
