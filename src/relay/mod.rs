pub mod chat;
pub mod summarize;

use axum::{ http::StatusCode, response::{ IntoResponse, Response }, Json };
use log::debug;
use thiserror::Error;
use crate::models::api::ErrorBody;

pub use self::chat::ChatRelayService;
pub use self::summarize::SummarizeRelayService;

/// Client-facing failures. The Display text is the whole public message;
/// upstream causes are logged where they occur and never carried here.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RelayError {
    #[error("Invalid request body")]
    InvalidRequest,
    #[error("Message is required")]
    MissingMessage,
    #[error("PDF file is required")]
    MissingFile,
    #[error("PDF file is too large")]
    PayloadTooLarge,
    #[error("Something went wrong")]
    ChatGenerationFailed,
    #[error("Failed to read PDF")]
    PdfExtractionFailed,
    #[error("Failed to summarize PDF")]
    SummarizationFailed,
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidRequest | RelayError::MissingMessage | RelayError::MissingFile =>
                StatusCode::BAD_REQUEST,
            RelayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::ChatGenerationFailed
            | RelayError::PdfExtractionFailed
            | RelayError::SummarizationFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.status().is_client_error()
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        if self.is_validation() {
            debug!("Rejected request: {}", self);
        }
        (self.status(), Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use async_trait::async_trait;
    use axum::body::Bytes;
    use std::sync::Mutex;
    use std::time::Duration;
    use crate::llm::{ InferenceClient, InferenceError, InferenceRequest, InferenceResponse };
    use crate::pdf::{ PdfError, PdfTextExtractor };

    /// Records every request and answers with a fixed outcome.
    pub struct FakeInference {
        pub outcome: Result<String, InferenceError>,
        pub calls: Mutex<Vec<(InferenceRequest, Duration)>>,
    }

    impl FakeInference {
        pub fn replying(text: &str) -> Self {
            Self { outcome: Ok(text.to_string()), calls: Mutex::default() }
        }

        pub fn failing(err: InferenceError) -> Self {
            Self { outcome: Err(err), calls: Mutex::default() }
        }

        pub fn calls(&self) -> Vec<(InferenceRequest, Duration)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InferenceClient for FakeInference {
        async fn generate(
            &self,
            request: &InferenceRequest,
            timeout: Duration
        ) -> Result<InferenceResponse, InferenceError> {
            self.calls.lock().unwrap().push((request.clone(), timeout));
            self.outcome.clone().map(|text| InferenceResponse { text: text.trim().to_string() })
        }
    }

    pub struct FakeExtractor {
        pub outcome: Result<String, String>,
        pub calls: Mutex<usize>,
    }

    impl FakeExtractor {
        pub fn yielding(text: impl Into<String>) -> Self {
            Self { outcome: Ok(text.into()), calls: Mutex::new(0) }
        }

        pub fn failing(msg: &str) -> Self {
            Self { outcome: Err(msg.to_string()), calls: Mutex::new(0) }
        }

        pub fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl PdfTextExtractor for FakeExtractor {
        async fn extract(&self, _content: Bytes) -> Result<String, PdfError> {
            *self.calls.lock().unwrap() += 1;
            self.outcome.clone().map_err(PdfError::UnparsablePdf)
        }
    }
}
