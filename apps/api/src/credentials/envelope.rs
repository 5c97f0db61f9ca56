//! Wire and binary forms of a sealed mail password.

use serde::{Deserialize, Serialize};

use crate::credentials::error::CodecError;

/// Cipher suite identifier carried in every envelope.
pub const ALGORITHM: &str = "AES-256-GCM";
/// Reserved for key rotation. Written on encrypt, ignored on decrypt.
pub const KEY_VERSION: u32 = 1;
/// GCM nonce size used for mail credentials.
pub const IV_SIZE: usize = 16;
/// Detached GCM authentication tag size.
pub const TAG_SIZE: usize = 16;

/// Hex-encoded envelope as stored and transported.
///
/// Serializes as `{ encrypted, iv, tag, alg, keyVersion }`; `cipher` is
/// accepted in place of `encrypted` when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(alias = "cipher")]
    pub encrypted: String,
    pub iv: String,
    pub tag: String,
    #[serde(default = "default_alg")]
    pub alg: String,
    #[serde(default = "default_key_version")]
    pub key_version: u32,
}

fn default_alg() -> String {
    ALGORITHM.to_string()
}

fn default_key_version() -> u32 {
    KEY_VERSION
}

/// Decoded envelope, ready for the cipher.
#[derive(Debug)]
pub(crate) struct SealedParts {
    pub ciphertext: Vec<u8>,
    pub iv: [u8; IV_SIZE],
    pub tag: [u8; TAG_SIZE],
}

impl Envelope {
    pub(crate) fn from_parts(parts: &SealedParts) -> Self {
        Self {
            encrypted: hex::encode(&parts.ciphertext),
            iv: hex::encode(parts.iv),
            tag: hex::encode(parts.tag),
            alg: default_alg(),
            key_version: KEY_VERSION,
        }
    }

    /// Decodes the hex fields and checks their sizes. Any defect yields the
    /// same opaque `Decryption` error so callers cannot tell them apart.
    pub(crate) fn decode(&self) -> Result<SealedParts, CodecError> {
        let ciphertext = hex::decode(self.encrypted.trim()).map_err(|_| CodecError::Decryption)?;
        if ciphertext.is_empty() {
            return Err(CodecError::Decryption);
        }

        let iv = decode_fixed::<IV_SIZE>(&self.iv)?;
        let tag = decode_fixed::<TAG_SIZE>(&self.tag)?;

        Ok(SealedParts {
            ciphertext,
            iv,
            tag,
        })
    }

    /// Checks that the envelope is well formed without decrypting it.
    pub fn check_shape(&self) -> Result<(), CodecError> {
        if self.alg != ALGORITHM {
            return Err(CodecError::validation(format!(
                "Unsupported envelope algorithm '{}'",
                self.alg
            )));
        }
        self.decode()
            .map(|_| ())
            .map_err(|_| CodecError::validation("Envelope fields are not well-formed hex"))
    }
}

fn decode_fixed<const N: usize>(field: &str) -> Result<[u8; N], CodecError> {
    let bytes = hex::decode(field.trim()).map_err(|_| CodecError::Decryption)?;
    bytes.try_into().map_err(|_| CodecError::Decryption)
}

/// Envelope as it arrives in a request body, before its presence is checked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvelopeInput {
    #[serde(alias = "encrypted")]
    pub cipher: Option<String>,
    pub iv: Option<String>,
    pub tag: Option<String>,
}

impl TryFrom<EnvelopeInput> for Envelope {
    type Error = CodecError;

    fn try_from(input: EnvelopeInput) -> Result<Self, Self::Error> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        match (present(input.cipher), present(input.iv), present(input.tag)) {
            (Some(encrypted), Some(iv), Some(tag)) => Ok(Envelope {
                encrypted,
                iv,
                tag,
                alg: default_alg(),
                key_version: KEY_VERSION,
            }),
            _ => Err(CodecError::validation(
                "mailPassword must include cipher, iv and tag",
            )),
        }
    }
}
