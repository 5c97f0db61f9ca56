use std::sync::Arc;

use sqlx::PgPool;

use crate::credentials::EnvelopeCodec;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::mail::MailTransport;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    /// `None` when the mail-password key is missing or invalid; the
    /// credential endpoints then answer with a configuration error.
    pub codec: Option<Arc<EnvelopeCodec>>,
    /// Pluggable delivery backend. Default: SmtpMailer.
    pub mailer: Arc<dyn MailTransport>,
}

impl AppState {
    pub fn codec(&self) -> Result<&EnvelopeCodec, AppError> {
        self.codec.as_deref().ok_or_else(|| {
            AppError::Configuration("Encryption key is not set (MAIL_PASS_ENC_KEY)".to_string())
        })
    }
}
