//! PDF text extraction.

use thiserror::Error;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("Uploaded file is not a PDF")]
    NotPdf,

    #[error("Could not read text from PDF: {0}")]
    Extraction(String),

    #[error("PDF contains no extractable text")]
    Empty,
}

/// Extracts and tidies the text of a PDF held in memory.
/// CPU-bound; call from a blocking task.
pub fn extract_text(bytes: &[u8]) -> Result<String, ResumeError> {
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(ResumeError::NotPdf);
    }

    let raw = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ResumeError::Extraction(e.to_string()))?;

    let text = normalize_text(&raw);
    if text.is_empty() {
        return Err(ResumeError::Empty);
    }
    Ok(text)
}

/// Collapses whitespace runs within each line and squeezes blank lines to one.
pub fn normalize_text(raw: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut previous_blank = true;

    for line in raw.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            if !previous_blank {
                lines.push(String::new());
            }
            previous_blank = true;
        } else {
            lines.push(line);
            previous_blank = false;
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
