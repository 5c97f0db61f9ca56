//! Mail Transport: pluggable delivery backend.
//!
//! Default: `SmtpMailer` (Gmail SMTP relay authenticated with the sender's app password).
//! `AppState` holds an `Arc<dyn MailTransport>` so handlers never touch SMTP directly.

use std::time::Duration;

use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::mail::{MailError, OutgoingMessage};

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Sender account and its plaintext app password.
/// The password is zeroized on drop and never printed.
pub struct SenderCredentials {
    pub email: String,
    password: Zeroizing<String>,
}

impl SenderCredentials {
    pub fn new(email: impl Into<String>, password: Zeroizing<String>) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for SenderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SenderCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Delivery backend. Implement this to swap transports without touching handlers.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Delivers `message` from the sender's account.
    async fn send(
        &self,
        sender: &SenderCredentials,
        message: &OutgoingMessage,
    ) -> Result<(), MailError>;

    /// Checks that the sender's credentials are accepted, without sending anything.
    async fn verify(&self, sender: &SenderCredentials) -> Result<(), MailError>;
}

/// SMTP relay over implicit TLS, authenticated per request.
pub struct SmtpMailer {
    host: String,
}

impl SmtpMailer {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    fn transport(
        &self,
        sender: &SenderCredentials,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let credentials = Credentials::new(sender.email.clone(), sender.password().to_string());
        Ok(AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)?
            .credentials(credentials)
            .timeout(Some(SMTP_TIMEOUT))
            .build())
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(
        &self,
        sender: &SenderCredentials,
        message: &OutgoingMessage,
    ) -> Result<(), MailError> {
        let mime = message.to_mime(&sender.email)?;
        let response = self.transport(sender)?.send(mime).await?;
        debug!("SMTP accepted message: code={}", response.code());
        info!(
            "Sent mail from {} to {} recipient(s)",
            sender.email,
            message.to.len()
        );
        Ok(())
    }

    async fn verify(&self, sender: &SenderCredentials) -> Result<(), MailError> {
        let connected = self.transport(sender)?.test_connection().await?;
        if !connected {
            return Err(MailError::Rejected(
                "SMTP server did not accept the connection".to_string(),
            ));
        }
        Ok(())
    }
}
