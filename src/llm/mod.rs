pub mod ollama;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

pub use self::ollama::OllamaClient;

/// Option key forwarded to the inference server to steer layer offload.
pub const GPU_LAYERS_OPTION: &str = "num_gpu_layers";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceRequest {
    pub model: String,
    pub prompt: String,
    #[serde(rename = "stream")]
    pub streaming: bool,
    #[serde(rename = "options")]
    pub generation_options: BTreeMap<String, JsonValue>,
}

impl InferenceRequest {
    /// Non-streaming request with no generation options.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            streaming: false,
            generation_options: BTreeMap::new(),
        }
    }

    pub fn with_option(mut self, name: &str, value: impl Into<JsonValue>) -> Self {
        self.generation_options.insert(name.to_string(), value.into());
        self
    }

    pub fn with_gpu_layers(self, layers: u32) -> Self {
        self.with_option(GPU_LAYERS_OPTION, layers)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceResponse {
    pub text: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InferenceError {
    /// Network failure, timeout or non-success status. Carries the cause for logs.
    #[error("inference server unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("invalid response from inference server: {0}")]
    InvalidUpstreamResponse(String),
}

/// A single-shot text generation endpoint. Implementations never retry.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn generate(
        &self,
        request: &InferenceRequest,
        timeout: Duration
    ) -> Result<InferenceResponse, InferenceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "deepseek-r1:7b".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_to_generate_wire_shape() {
        let req = InferenceRequest::new("deepseek-r1:7b", "chat : Hello").with_gpu_layers(100);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "deepseek-r1:7b",
                "prompt": "chat : Hello",
                "stream": false,
                "options": { "num_gpu_layers": 100 }
            })
        );
    }

    #[test]
    fn options_are_overwritten_not_duplicated() {
        let req = InferenceRequest::new("m", "p").with_gpu_layers(100).with_gpu_layers(400);
        assert_eq!(req.generation_options.len(), 1);
        assert_eq!(req.generation_options[GPU_LAYERS_OPTION], json!(400));
    }
}
