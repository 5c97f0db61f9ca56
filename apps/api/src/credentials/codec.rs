//! AES-256-GCM envelope codec for mail app passwords.
//!
//! Each call draws a fresh 16-byte IV from the OS-seeded CSPRNG, encrypts
//! without associated data and returns the tag detached from the ciphertext.
//! Decryption verifies the tag before any plaintext leaves this module.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::credentials::envelope::{Envelope, SealedParts, IV_SIZE, TAG_SIZE};
use crate::credentials::error::CodecError;
use crate::credentials::key::CredentialKey;

/// AES-256-GCM with a 16-byte nonce.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Seals and unseals credential envelopes under the process key.
///
/// Holds only the expanded key schedule; safe to share behind an `Arc`.
#[derive(Clone)]
pub struct EnvelopeCodec {
    cipher: Aes256Gcm16,
}

impl EnvelopeCodec {
    pub fn new(key: CredentialKey) -> Self {
        let cipher = Aes256Gcm16::new(GenericArray::from_slice(key.as_bytes()));
        Self { cipher }
    }

    /// Encrypts a non-empty secret into a hex envelope.
    pub fn encrypt(&self, plaintext: &str) -> Result<Envelope, CodecError> {
        if plaintext.is_empty() {
            return Err(CodecError::validation("Secret must not be empty"));
        }

        let mut iv = [0u8; IV_SIZE];
        rand::thread_rng().fill_bytes(&mut iv);

        let mut buffer = plaintext.as_bytes().to_vec();
        let tag = self
            .cipher
            .encrypt_in_place_detached(GenericArray::from_slice(&iv), b"", &mut buffer)
            .map_err(|_| CodecError::configuration("Cipher rejected the encryption request"))?;

        let mut tag_bytes = [0u8; TAG_SIZE];
        tag_bytes.copy_from_slice(&tag);

        Ok(Envelope::from_parts(&SealedParts {
            ciphertext: buffer,
            iv,
            tag: tag_bytes,
        }))
    }

    /// Recovers the secret from an envelope produced under the same key.
    pub fn decrypt(&self, envelope: &Envelope) -> Result<Zeroizing<String>, CodecError> {
        let SealedParts {
            ciphertext,
            iv,
            tag,
        } = envelope.decode()?;

        let mut buffer = Zeroizing::new(ciphertext);
        self.cipher
            .decrypt_in_place_detached(
                GenericArray::from_slice(&iv),
                b"",
                &mut buffer,
                GenericArray::from_slice(&tag),
            )
            .map_err(|_| CodecError::Decryption)?;

        let plaintext = std::str::from_utf8(&buffer).map_err(|_| CodecError::Decryption)?;
        Ok(Zeroizing::new(plaintext.to_owned()))
    }
}

impl std::fmt::Debug for EnvelopeCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeCodec")
            .field("alg", &crate::credentials::envelope::ALGORITHM)
            .finish_non_exhaustive()
    }
}
