//! Axum route handler for outbound mail.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::credentials::{Envelope, EnvelopeInput};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::mail::message::{parse_mailbox, AttachmentInput, OutgoingMessage};
use crate::mail::SenderCredentials;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub to: Option<String>,
    pub subject: Option<String>,
    /// Plain-text body.
    pub body: Option<String>,
    pub html: Option<String>,
    #[serde(default)]
    pub attachments: Vec<AttachmentInput>,
    pub from_email: Option<String>,
    pub mail_password: Option<EnvelopeInput>,
}

/// POST /send
///
/// Unseals the sender's app password and hands the message to the mail transport.
pub async fn handle_send(
    State(state): State<AppState>,
    AppJson(request): AppJson<SendRequest>,
) -> Result<Json<Value>, AppError> {
    let message = OutgoingMessage::new(
        request.to,
        request.subject,
        request.body,
        request.html,
        request.attachments,
    )?;

    let from_email = request
        .from_email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Validation("Missing 'fromEmail'".to_string()))?;
    parse_mailbox(&from_email, "sender")?;
    let envelope = Envelope::try_from(request.mail_password.unwrap_or_default())?;

    let password = state.codec()?.decrypt(&envelope)?;
    let sender = SenderCredentials::new(from_email, password);

    state.mailer.send(&sender, &message).await?;
    info!(
        "Dispatched '{}' from {} with {} attachment(s)",
        message.subject,
        sender.email,
        message.attachments.len()
    );

    Ok(Json(json!({ "success": true })))
}
