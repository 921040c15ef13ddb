use crate::models::api::{ ChatReply, ChatRequest, SummaryReply };
use crate::models::chat::PdfUpload;
use crate::relay::{ ChatRelayService, RelayError, SummarizeRelayService };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    extract::{ DefaultBodyLimit, Multipart, State },
    extract::multipart::{ MultipartError, MultipartRejection },
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::Html,
    Json,
};
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, warn, error };

/// Multipart field carrying the uploaded document.
pub const PDF_FIELD: &str = "pdf";
const DEFAULT_FILE_NAME: &str = "upload.pdf";

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatRelayService>,
    pub summarize: Arc<SummarizeRelayService>,
}

#[derive(Debug, Clone)]
pub struct TlsPaths {
    pub cert_path: String,
    pub key_path: String,
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/chat", post(chat_handler))
        .route(
            "/api/summarize-pdf",
            post(summarize_handler).layer(DefaultBodyLimit::max(max_upload_bytes))
        )
        .layer(cors)
        .with_state(state)
}

pub async fn start_http_server(
    addr: SocketAddr,
    app: Router,
    tls: Option<TlsPaths>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match tls {
        Some(paths) => {
            info!(
                "TLS enabled. Loading certificate from '{}' and key from '{}'",
                paths.cert_path,
                paths.key_path
            );
            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                &paths.cert_path,
                &paths.key_path
            ).await?;

            info!("Starting HTTPS server on: https://{}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
                error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
                e
            })?;
            info!("Starting HTTP server on: http://{}", listener.local_addr()?);
            axum::serve(listener, app.into_make_service())
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// The relay future is awaited inline so a client disconnect drops the
// in-flight inference request with it.
async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, RelayError> {
    let Json(req) = payload.map_err(|e| {
        warn!("Rejected chat body: {}", e);
        RelayError::InvalidRequest
    })?;

    state.chat.handle_chat(req.message.as_deref()).await.map(Json)
}

async fn summarize_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummaryReply>, RelayError> {
    let upload = match multipart {
        Ok(multipart) => read_pdf_field(multipart).await?,
        Err(e) => {
            warn!("Summarize request is not multipart: {}", e);
            None
        }
    };

    state.summarize.handle_summarize(upload).await.map(Json)
}

/// Returns the first `pdf` part, skipping any other form fields.
async fn read_pdf_field(mut multipart: Multipart) -> Result<Option<PdfUpload>, RelayError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(PDF_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or(DEFAULT_FILE_NAME).to_string();
        let content = field.bytes().await.map_err(multipart_error)?;
        return Ok(Some(PdfUpload::new(content, file_name)));
    }
    Ok(None)
}

fn multipart_error(e: MultipartError) -> RelayError {
    warn!("Failed to read multipart body: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RelayError::PayloadTooLarge
    } else {
        RelayError::InvalidRequest
    }
}
