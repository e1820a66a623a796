use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

/// Extractions shorter than this are treated as failures (scanned or empty PDFs).
pub const MIN_TEXT_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Could not read PDF: {0}")]
    Extraction(String),

    #[error("Text extraction failed: only {chars} characters found")]
    TooShort { chars: usize },

    #[error("PDF extraction task failed: {0}")]
    Task(String),
}

/// Extracts the text layer of a PDF.
///
/// `pdf-extract` is CPU-bound and can panic on malformed input, so it runs on
/// the blocking pool; a panic surfaces as `PdfError::Task`.
pub async fn extract_pdf_text(pdf_bytes: Bytes) -> Result<String, PdfError> {
    let text = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&pdf_bytes)
            .map_err(|e| PdfError::Extraction(e.to_string()))
    })
    .await
    .map_err(|e| PdfError::Task(e.to_string()))??;

    let text = require_text(text)?;
    debug!("Extracted {} characters from PDF", text.len());
    Ok(text)
}

/// Rejects extractions with fewer than `MIN_TEXT_CHARS` non-whitespace-padded characters.
pub fn require_text(text: String) -> Result<String, PdfError> {
    let chars = text.trim().chars().count();
    if chars < MIN_TEXT_CHARS {
        return Err(PdfError::TooShort { chars });
    }
    Ok(text)
}
