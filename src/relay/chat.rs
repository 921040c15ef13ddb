use std::sync::Arc;
use std::time::Duration;
use log::{ info, error };
use uuid::Uuid;
use crate::llm::{ InferenceClient, InferenceRequest };
use crate::models::api::ChatReply;
use super::RelayError;

pub const CHAT_PROMPT_PREFIX: &str = "chat : ";
pub const CHAT_GPU_LAYERS: u32 = 100;
pub const DEFAULT_CHAT_TIMEOUT: Duration = Duration::from_secs(60);

pub struct ChatRelayService {
    inference: Arc<dyn InferenceClient>,
    model: String,
    timeout: Duration,
}

impl ChatRelayService {
    pub fn new(inference: Arc<dyn InferenceClient>, model: impl Into<String>, timeout: Duration) -> Self {
        Self { inference, model: model.into(), timeout }
    }

    pub fn build_request(&self, message: &str) -> InferenceRequest {
        InferenceRequest::new(self.model.clone(), format!("{}{}", CHAT_PROMPT_PREFIX, message))
            .with_gpu_layers(CHAT_GPU_LAYERS)
    }

    /// Validates `message`, forwards it and returns the trimmed reply.
    /// The message is forwarded untrimmed; only the emptiness check trims.
    pub async fn handle_chat(&self, message: Option<&str>) -> Result<ChatReply, RelayError> {
        let message = match message {
            Some(m) if !m.trim().is_empty() => m,
            _ => return Err(RelayError::MissingMessage),
        };

        let request_id = Uuid::new_v4();
        info!("[{}] chat request ({} chars)", request_id, message.chars().count());

        let request = self.build_request(message);
        match self.inference.generate(&request, self.timeout).await {
            Ok(resp) => {
                info!("[{}] chat reply ({} chars)", request_id, resp.text.chars().count());
                Ok(ChatReply { reply: resp.text.trim().to_string() })
            }
            Err(e) => {
                error!("[{}] Inference API error: {}", request_id, e);
                Err(RelayError::ChatGenerationFailed)
            }
        }
    }
}
