// Credential envelopes: sealing Gmail app passwords at rest and unsealing
// them at send time. The key is loaded once at startup and injected into
// `EnvelopeCodec`; it is never re-read or logged.

pub mod codec;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod key;

pub use codec::EnvelopeCodec;
pub use envelope::{Envelope, EnvelopeInput};
pub use error::CodecError;
pub use key::{CredentialKey, KeyEncoding};
