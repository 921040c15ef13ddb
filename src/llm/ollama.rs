use reqwest::Client as HttpClient;
use serde::Deserialize;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;
use log::debug;
use super::{ InferenceClient, InferenceConfig, InferenceError, InferenceRequest, InferenceResponse };

const GENERATE_ROUTE: &str = "/api/generate";

#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: HttpClient,
    generate_url: Url,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

impl OllamaClient {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let generate_url = Url::parse(
            &format!("{}{}", base_url.trim_end_matches('/'), GENERATE_ROUTE)
        )?;

        Ok(Self {
            http: HttpClient::new(),
            generate_url,
        })
    }

    pub fn from_config(config: &InferenceConfig) -> Result<Self, url::ParseError> {
        Self::new(&config.base_url)
    }

    pub fn generate_url(&self) -> &Url {
        &self.generate_url
    }
}

fn describe_transport_error(err: &reqwest::Error, timeout: Duration) -> String {
    if err.is_timeout() {
        format!("request timed out after {}ms", timeout.as_millis())
    } else {
        err.to_string()
    }
}

/// Pulls the generated text out of a raw generate body.
fn parse_generate_body(body: &str) -> Result<InferenceResponse, InferenceError> {
    let parsed: GenerateResponse = serde_json
        ::from_str(body)
        .map_err(|e| InferenceError::InvalidUpstreamResponse(format!("undecodable body: {}", e)))?;

    match parsed.response {
        Some(text) if !text.is_empty() => Ok(InferenceResponse { text: text.trim().to_string() }),
        Some(_) => Err(InferenceError::InvalidUpstreamResponse("empty `response` field".into())),
        None => Err(InferenceError::InvalidUpstreamResponse("missing `response` field".into())),
    }
}

#[async_trait]
impl InferenceClient for OllamaClient {
    async fn generate(
        &self,
        request: &InferenceRequest,
        timeout: Duration
    ) -> Result<InferenceResponse, InferenceError> {
        debug!(
            "POST {} model={} prompt_chars={}",
            self.generate_url,
            request.model,
            request.prompt.chars().count()
        );

        let resp = self.http
            .post(self.generate_url.clone())
            .json(request)
            .timeout(timeout)
            .send().await
            .map_err(|e| InferenceError::UpstreamUnavailable(describe_transport_error(&e, timeout)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(InferenceError::UpstreamUnavailable(format!("HTTP error: {}", status)));
        }

        let body = resp
            .text().await
            .map_err(|e| InferenceError::UpstreamUnavailable(describe_transport_error(&e, timeout)))?;

        parse_generate_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{ routing::post, Json, Router, http::StatusCode };
    use serde_json::{ json, Value };
    use std::sync::{ Arc, Mutex };

    async fn spawn_upstream(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn generate_url_appends_route_once() {
        let client = OllamaClient::new("http://localhost:11434/").unwrap();
        assert_eq!(client.generate_url().as_str(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn rejects_unparsable_base_url() {
        assert!(OllamaClient::new("not a url").is_err());
    }

    #[test]
    fn parse_trims_response_text() {
        let resp = parse_generate_body(r#"{"response":" Hi there! ","done":true}"#).unwrap();
        assert_eq!(resp.text, "Hi there!");
    }

    #[test]
    fn parse_flags_missing_or_empty_field() {
        assert!(matches!(
            parse_generate_body(r#"{"done":true}"#),
            Err(InferenceError::InvalidUpstreamResponse(_))
        ));
        assert!(matches!(
            parse_generate_body(r#"{"response":""}"#),
            Err(InferenceError::InvalidUpstreamResponse(_))
        ));
        assert!(matches!(
            parse_generate_body("<html>"),
            Err(InferenceError::InvalidUpstreamResponse(_))
        ));
    }

    #[tokio::test]
    async fn sends_wire_request_and_returns_trimmed_text() {
        let seen: Arc<Mutex<Vec<Value>>> = Arc::default();
        let captured = seen.clone();
        let app = Router::new().route(
            "/api/generate",
            post(move |Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    captured.lock().unwrap().push(body);
                    Json(json!({ "response": " Hi there! ", "done": true }))
                }
            })
        );
        let base = spawn_upstream(app).await;
        let client = OllamaClient::new(&base).unwrap();

        let req = InferenceRequest::new("deepseek-r1:7b", "chat : Hello").with_gpu_layers(100);
        let resp = client.generate(&req, Duration::from_secs(5)).await.unwrap();

        assert_eq!(resp.text, "Hi there!");
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            json!({
                "model": "deepseek-r1:7b",
                "prompt": "chat : Hello",
                "stream": false,
                "options": { "num_gpu_layers": 100 }
            })
        );
    }

    #[tokio::test]
    async fn model_comes_from_each_request() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::default();
        let captured = seen.clone();
        let app = Router::new().route(
            "/api/generate",
            post(move |Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    captured.lock().unwrap().push(body["model"].as_str().unwrap_or_default().to_string());
                    Json(json!({ "response": "ok" }))
                }
            })
        );
        let client = OllamaClient::new(&spawn_upstream(app).await).unwrap();

        for model in ["llama3:8b", "deepseek-r1:7b"] {
            client.generate(&InferenceRequest::new(model, "p"), Duration::from_secs(5)).await.unwrap();
        }
        assert_eq!(*seen.lock().unwrap(), vec!["llama3:8b".to_string(), "deepseek-r1:7b".to_string()]);
    }

    #[tokio::test]
    async fn non_success_status_is_unavailable() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded") })
        );
        let base = spawn_upstream(app).await;
        let client = OllamaClient::new(&base).unwrap();

        let err = client
            .generate(&InferenceRequest::new("m", "p"), Duration::from_secs(5)).await
            .unwrap_err();
        assert!(matches!(err, InferenceError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async { Json(json!({ "error": "nope" })) })
        );
        let base = spawn_upstream(app).await;
        let client = OllamaClient::new(&base).unwrap();

        let err = client
            .generate(&InferenceRequest::new("m", "p"), Duration::from_secs(5)).await
            .unwrap_err();
        assert!(matches!(err, InferenceError::InvalidUpstreamResponse(_)));
    }

    #[tokio::test]
    async fn slow_upstream_times_out_as_unavailable() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({ "response": "late" }))
            })
        );
        let base = spawn_upstream(app).await;
        let client = OllamaClient::new(&base).unwrap();

        let err = client
            .generate(&InferenceRequest::new("m", "p"), Duration::from_millis(100)).await
            .unwrap_err();
        match err {
            InferenceError::UpstreamUnavailable(msg) => assert!(msg.contains("timed out")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_upstream_is_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = OllamaClient::new(&format!("http://{}", addr)).unwrap();

        let err = client
            .generate(&InferenceRequest::new("m", "p"), Duration::from_secs(2)).await
            .unwrap_err();
        assert!(matches!(err, InferenceError::UpstreamUnavailable(_)));
    }
}
