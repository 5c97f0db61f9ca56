//! Axum route handler for resume uploads.

use axum::{extract::Multipart, Json};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::resume::extract::{extract_text, ResumeError};

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct ParsedResume {
    pub text: String,
    pub chars: usize,
}

/// POST /parse-resume
///
/// Accepts a multipart form with a `file` field holding a PDF and returns its text.
pub async fn handle_parse_resume(mut multipart: Multipart) -> Result<Json<ParsedResume>, AppError> {
    let mut upload: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
            upload = Some(bytes);
            break;
        }
    }

    let bytes = upload
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::Validation("Missing 'file' upload".to_string()))?;

    let text = tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .map_err(|e| {
            warn!("PDF extraction task aborted: {e}");
            AppError::UnprocessableEntity("Could not read text from PDF".to_string())
        })?
        .map_err(|e| match e {
            ResumeError::NotPdf | ResumeError::Empty => AppError::Validation(e.to_string()),
            ResumeError::Extraction(_) => AppError::UnprocessableEntity(e.to_string()),
        })?;

    let chars = text.chars().count();
    info!("Extracted {chars} characters from uploaded resume");
    Ok(Json(ParsedResume { text, chars }))
}
