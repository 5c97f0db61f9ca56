//! Process-wide AES-256 key for sealing mail app passwords.

use std::str::FromStr;

use base64::{engine::general_purpose, Engine as _};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::credentials::error::CodecError;

/// Size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;

/// Textual encoding of the configured key. Set explicitly at deployment,
/// never guessed from the value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyEncoding {
    #[default]
    Hex,
    Base64,
}

impl FromStr for KeyEncoding {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(KeyEncoding::Hex),
            "base64" => Ok(KeyEncoding::Base64),
            other => Err(CodecError::configuration(format!(
                "Unknown key encoding '{other}'; expected 'hex' or 'base64'"
            ))),
        }
    }
}

/// The 32-byte credential key. Zeroized on drop; never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CredentialKey {
    bytes: [u8; KEY_SIZE],
}

impl CredentialKey {
    /// Wraps raw key bytes, refusing anything that is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != KEY_SIZE {
            return Err(CodecError::configuration(format!(
                "Encryption key must be {KEY_SIZE} bytes (AES-256), got {}",
                bytes.len()
            )));
        }

        let mut key_bytes = [0u8; KEY_SIZE];
        key_bytes.copy_from_slice(bytes);
        Ok(Self { bytes: key_bytes })
    }

    /// Decodes a configured key value using the declared encoding.
    pub fn decode(raw: &str, encoding: KeyEncoding) -> Result<Self, CodecError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(CodecError::configuration("Encryption key is empty"));
        }

        let decoded = match encoding {
            KeyEncoding::Hex => hex::decode(raw)
                .map_err(|_| CodecError::configuration("Encryption key is not valid hex"))?,
            KeyEncoding::Base64 => general_purpose::STANDARD
                .decode(raw)
                .map_err(|_| CodecError::configuration("Encryption key is not valid base64"))?,
        };
        let decoded = Zeroizing::new(decoded);

        Self::from_bytes(&decoded)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for CredentialKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
