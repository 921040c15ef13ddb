pub mod session;
pub mod state;
pub mod terminal;

use async_trait::async_trait;
use reqwest::{ multipart, Client as HttpClient, Response };
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;
use crate::models::api::{ ChatReply, ChatRequest, ErrorBody, SummaryReply };
use crate::models::chat::PdfUpload;
use crate::server::api::PDF_FIELD;

pub use self::session::ChatSession;
pub use self::state::{ ClientInteractionState, NoticeLevel, Notification, Phase };

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

/// The two backend routes, as seen by a UI.
#[async_trait]
pub trait RelayApi: Send + Sync {
    async fn chat(&self, message: &str) -> Result<String, ClientError>;
    async fn summarize(&self, upload: PdfUpload) -> Result<String, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpRelayApi {
    http: HttpClient,
    chat_url: Url,
    summarize_url: Url,
}

impl HttpRelayApi {
    pub fn new(backend_url: &str) -> Result<Self, url::ParseError> {
        let base = backend_url.trim_end_matches('/');
        Ok(Self {
            http: HttpClient::new(),
            chat_url: Url::parse(&format!("{}/api/chat", base))?,
            summarize_url: Url::parse(&format!("{}/api/summarize-pdf", base))?,
        })
    }
}

async fn read_reply<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
    };
    Err(ClientError::Status { status: status.as_u16(), message })
}

#[async_trait]
impl RelayApi for HttpRelayApi {
    async fn chat(&self, message: &str) -> Result<String, ClientError> {
        let req = ChatRequest { message: Some(message.to_string()) };
        let resp = self.http.post(self.chat_url.clone()).json(&req).send().await?;
        let reply: ChatReply = read_reply(resp).await?;
        Ok(reply.reply)
    }

    async fn summarize(&self, upload: PdfUpload) -> Result<String, ClientError> {
        let part = multipart::Part
            ::bytes(upload.content.to_vec())
            .file_name(upload.file_name)
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part(PDF_FIELD, part);

        let resp = self.http.post(self.summarize_url.clone()).multipart(form).send().await?;
        let reply: SummaryReply = read_reply(resp).await?;
        Ok(reply.summary)
    }
}
