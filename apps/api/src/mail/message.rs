//! Outgoing message model and its conversion to a MIME message.

use base64::{engine::general_purpose, Engine as _};
use lettre::message::{
    header::ContentType, Attachment as MimeAttachment, Mailbox, MultiPart, SinglePart,
};
use lettre::Message;
use serde::Deserialize;

use crate::errors::AppError;
use crate::mail::MailError;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Attachment as it arrives in a request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentInput {
    pub filename: Option<String>,
    pub content: Option<String>,
    /// `base64` (default) or `utf8`.
    pub encoding: Option<String>,
    pub content_type: Option<String>,
}

/// Parses a request-supplied address; `role` names it in the error.
pub fn parse_mailbox(addr: &str, role: &str) -> Result<Mailbox, AppError> {
    addr.trim()
        .parse::<Mailbox>()
        .map_err(|_| AppError::Validation(format!("Invalid {role} address '{}'", addr.trim())))
}

/// A decoded, validated attachment.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub content: Vec<u8>,
    pub content_type: ContentType,
}

impl TryFrom<AttachmentInput> for Attachment {
    type Error = AppError;

    fn try_from(input: AttachmentInput) -> Result<Self, Self::Error> {
        let filename = input
            .filename
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .ok_or_else(|| AppError::Validation("Attachment is missing a filename".to_string()))?;

        let raw = input.content.unwrap_or_default();
        let encoding = input.encoding.unwrap_or_else(|| "base64".to_string());
        let content = match encoding.to_ascii_lowercase().as_str() {
            "base64" => general_purpose::STANDARD
                .decode(raw.trim())
                .map_err(|_| {
                    AppError::Validation(format!("Attachment '{filename}' is not valid base64"))
                })?,
            "utf8" | "utf-8" => raw.into_bytes(),
            other => {
                return Err(AppError::Validation(format!(
                    "Attachment '{filename}' has unsupported encoding '{other}'"
                )))
            }
        };

        let content_type = input
            .content_type
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let content_type = ContentType::parse(content_type.trim()).map_err(|_| {
            AppError::Validation(format!(
                "Attachment '{filename}' has invalid content type '{content_type}'"
            ))
        })?;

        Ok(Attachment {
            filename,
            content,
            content_type,
        })
    }
}

/// A message ready for delivery. Construction enforces the required fields.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub to: Vec<Mailbox>,
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
    pub attachments: Vec<Attachment>,
}

impl OutgoingMessage {
    /// Validates and assembles a message. `to` may hold several
    /// comma-separated addresses.
    pub fn new(
        to: Option<String>,
        subject: Option<String>,
        text: Option<String>,
        html: Option<String>,
        attachments: Vec<AttachmentInput>,
    ) -> Result<Self, AppError> {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let (to, subject) = match (non_blank(to), non_blank(subject)) {
            (Some(to), Some(subject)) => (to, subject),
            _ => return Err(missing_fields()),
        };
        let text = non_blank(text);
        let html = non_blank(html);
        if text.is_none() && html.is_none() {
            return Err(missing_fields());
        }

        let to = to
            .split(',')
            .map(str::trim)
            .filter(|addr| !addr.is_empty())
            .map(|addr| parse_mailbox(addr, "recipient"))
            .collect::<Result<Vec<_>, _>>()?;

        let attachments = attachments
            .into_iter()
            .map(Attachment::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            to,
            subject: subject.trim().to_string(),
            text,
            html,
            attachments,
        })
    }

    /// Renders the message as MIME with `from` as the sender.
    pub fn to_mime(&self, from: &str) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(from.parse::<Mailbox>()?)
            .subject(self.subject.clone());
        for mailbox in &self.to {
            builder = builder.to(mailbox.clone());
        }

        let mut body = match (&self.text, &self.html) {
            (Some(text), Some(html)) => MultiPart::mixed()
                .multipart(MultiPart::alternative_plain_html(text.clone(), html.clone())),
            (Some(text), None) => MultiPart::mixed().singlepart(SinglePart::plain(text.clone())),
            (None, Some(html)) => MultiPart::mixed().singlepart(SinglePart::html(html.clone())),
            (None, None) => return Err(MailError::Rejected("message has no body".to_string())),
        };

        for attachment in &self.attachments {
            body = body.singlepart(
                MimeAttachment::new(attachment.filename.clone())
                    .body(attachment.content.clone(), attachment.content_type.clone()),
            );
        }

        Ok(builder.multipart(body)?)
    }
}

fn missing_fields() -> AppError {
    AppError::Validation(
        "Missing required fields: to, subject, and either body or html".to_string(),
    )
}
