use std::sync::Arc;
use std::time::Duration;
use log::{ info, error };
use uuid::Uuid;
use crate::llm::{ InferenceClient, InferenceRequest };
use crate::models::api::SummaryReply;
use crate::models::chat::PdfUpload;
use crate::pdf::{ truncate_chars, PdfTextExtractor, EXCERPT_CHAR_LIMIT };
use super::RelayError;

pub const SUMMARY_PROMPT_PREFIX: &str =
    "Summarize this document briefly in 3 sentences, focusing only on key points:\n\n";
pub const SUMMARY_GPU_LAYERS: u32 = 400;
pub const DEFAULT_SUMMARIZE_TIMEOUT: Duration = Duration::from_secs(120);

pub struct SummarizeRelayService {
    inference: Arc<dyn InferenceClient>,
    extractor: Arc<dyn PdfTextExtractor>,
    model: String,
    timeout: Duration,
}

impl SummarizeRelayService {
    pub fn new(
        inference: Arc<dyn InferenceClient>,
        extractor: Arc<dyn PdfTextExtractor>,
        model: impl Into<String>,
        timeout: Duration
    ) -> Self {
        Self { inference, extractor, model: model.into(), timeout }
    }

    /// Prompt over the first `EXCERPT_CHAR_LIMIT` characters of `text`.
    pub fn build_request(&self, text: &str) -> InferenceRequest {
        let excerpt = truncate_chars(text, EXCERPT_CHAR_LIMIT);
        InferenceRequest::new(self.model.clone(), format!("{}{}", SUMMARY_PROMPT_PREFIX, excerpt))
            .with_gpu_layers(SUMMARY_GPU_LAYERS)
    }

    pub async fn handle_summarize(&self, upload: Option<PdfUpload>) -> Result<SummaryReply, RelayError> {
        let upload = match upload {
            Some(u) if !u.content.is_empty() => u,
            _ => return Err(RelayError::MissingFile),
        };

        let request_id = Uuid::new_v4();
        info!(
            "[{}] summarize request for '{}' ({} bytes)",
            request_id,
            upload.file_name,
            upload.content.len()
        );

        let text = self.extractor.extract(upload.content).await.map_err(|e| {
            error!("[{}] Error processing PDF '{}': {}", request_id, upload.file_name, e);
            RelayError::PdfExtractionFailed
        })?;

        let request = self.build_request(&text);
        match self.inference.generate(&request, self.timeout).await {
            Ok(resp) => {
                info!("[{}] summary ready ({} chars)", request_id, resp.text.chars().count());
                Ok(SummaryReply { summary: resp.text.trim().to_string() })
            }
            Err(e) => {
                error!("[{}] Inference API error while summarizing: {}", request_id, e);
                Err(RelayError::SummarizationFailed)
            }
        }
    }
}
