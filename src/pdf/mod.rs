use async_trait::async_trait;
use axum::body::Bytes;
use log::debug;
use thiserror::Error;

/// Characters of extracted text that are forwarded for summarization.
pub const EXCERPT_CHAR_LIMIT: usize = 5000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdfError {
    #[error("unparsable PDF: {0}")]
    UnparsablePdf(String),
}

/// Turns raw PDF bytes into plain text. Output is not bounded.
#[async_trait]
pub trait PdfTextExtractor: Send + Sync {
    async fn extract(&self, content: Bytes) -> Result<String, PdfError>;
}

/// `pdf-extract` backed extractor. Parsing is CPU bound and runs on the
/// blocking pool; a parser panic surfaces as `UnparsablePdf`.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractClient;

impl PdfExtractClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PdfTextExtractor for PdfExtractClient {
    async fn extract(&self, content: Bytes) -> Result<String, PdfError> {
        if !looks_like_pdf(&content) {
            return Err(PdfError::UnparsablePdf("missing %PDF- header".into()));
        }

        let size = content.len();
        let text = tokio::task
            ::spawn_blocking(move || {
                pdf_extract::extract_text_from_mem(&content).map_err(|e| e.to_string())
            })
            .await
            .map_err(|e| PdfError::UnparsablePdf(format!("extraction aborted: {}", e)))?
            .map_err(PdfError::UnparsablePdf)?;

        debug!("Extracted {} chars from {} byte PDF", text.chars().count(), size);
        Ok(text)
    }
}

/// Magic-byte check ahead of the full parse.
pub fn looks_like_pdf(head: &[u8]) -> bool {
    head.starts_with(b"%PDF-")
}

/// First `limit` characters of `text`. Counts chars, not bytes, and ignores word boundaries.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_prefix() {
        let text: String = (0..6000).map(|i| char::from(b'a' + ((i / 1000) as u8))).collect();
        let excerpt = truncate_chars(&text, EXCERPT_CHAR_LIMIT);
        assert_eq!(excerpt.chars().count(), 5000);
        assert_eq!(excerpt, &text[..5000]);
        assert!(!excerpt.contains('f'));
    }

    #[test]
    fn truncate_short_text_is_identity() {
        assert_eq!(truncate_chars("short", EXCERPT_CHAR_LIMIT), "short");
        assert_eq!(truncate_chars("", EXCERPT_CHAR_LIMIT), "");
    }

    #[test]
    fn truncate_counts_multibyte_chars() {
        let text = "é".repeat(10);
        assert_eq!(truncate_chars(&text, 3), "ééé");
    }

    #[test]
    fn magic_bytes() {
        assert!(looks_like_pdf(b"%PDF-1.7\n"));
        assert!(!looks_like_pdf(b"hello"));
        assert!(!looks_like_pdf(b""));
    }

    #[tokio::test]
    async fn garbage_is_unparsable() {
        let err = PdfExtractClient::new()
            .extract(Bytes::from_static(b"definitely not a pdf")).await
            .unwrap_err();
        assert!(matches!(err, PdfError::UnparsablePdf(_)));
    }

    #[tokio::test]
    async fn truncated_pdf_is_unparsable() {
        let err = PdfExtractClient::new()
            .extract(Bytes::from_static(b"%PDF-1.4\n1 0 obj\n<<")).await
            .unwrap_err();
        assert!(matches!(err, PdfError::UnparsablePdf(_)));
    }
}
