// Outbound mail: message model, the transport seam, and the /send handler.
// Credentials reach this module already decrypted; nothing here logs them.

pub mod error;
pub mod handlers;
pub mod message;
pub mod transport;

pub use error::MailError;
pub use message::OutgoingMessage;
pub use transport::{MailTransport, SenderCredentials, SmtpMailer};
