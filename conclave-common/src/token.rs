//! Opaque entity key tokens
//!
//! Conference and session identifiers are never exposed to clients directly.
//! Keys travel as a reversible URL-safe token encoding the entity kind and
//! its UUID, so a token minted for one kind cannot be replayed against
//! endpoints expecting another.

use crate::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use uuid::Uuid;

/// Entity kinds that participate in key token exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Conference,
    Session,
}

impl KeyKind {
    fn as_str(self) -> &'static str {
        match self {
            KeyKind::Conference => "conference",
            KeyKind::Session => "session",
        }
    }
}

/// Encode an entity id as an opaque key token
pub fn encode_key(kind: KeyKind, id: &str) -> String {
    URL_SAFE_NO_PAD.encode(format!("{}:{}", kind.as_str(), id))
}

/// Decode an opaque key token, validating the expected entity kind
/// and the embedded UUID
pub fn decode_key(token: &str, expected: KeyKind) -> Result<String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| Error::InvalidKey(token.to_string()))?;
    let decoded =
        String::from_utf8(bytes).map_err(|_| Error::InvalidKey(token.to_string()))?;

    let (kind, id) = decoded
        .split_once(':')
        .ok_or_else(|| Error::InvalidKey(token.to_string()))?;

    if kind != expected.as_str() {
        return Err(Error::InvalidKey(format!(
            "{} is not a {} key",
            token,
            expected.as_str()
        )));
    }

    Uuid::parse_str(id).map_err(|_| Error::InvalidKey(token.to_string()))?;

    Ok(id.to_string())
}
