use thiserror::Error;

/// Failures raised by the credential envelope codec.
///
/// The three kinds map onto distinct HTTP classes at the boundary:
/// configuration problems are server-side (500), validation and decryption
/// failures are caller-side (400).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The process key is absent, mis-encoded, or not 32 bytes.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The caller supplied an empty secret or an incomplete envelope.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Tag verification failed or the envelope is malformed.
    /// Deliberately carries no detail about which check failed.
    #[error("Decryption failed")]
    Decryption,
}

impl CodecError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        CodecError::Configuration(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        CodecError::Validation(msg.into())
    }
}
