pub mod cli;
pub mod client;
pub mod llm;
pub mod models;
pub mod pdf;
pub mod relay;
pub mod server;

use cli::{ Args, Command };
use client::HttpRelayApi;
use llm::{ InferenceClient, OllamaClient };
use log::info;
use pdf::{ PdfExtractClient, PdfTextExtractor };
use relay::{ ChatRelayService, SummarizeRelayService };
use server::api::AppState;
use server::Server;
use std::error::Error;
use std::sync::Arc;

/// Builds the relay services from `args`, sharing one inference client.
pub fn build_state(args: &Args) -> Result<AppState, Box<dyn Error + Send + Sync>> {
    let config = args.inference_config();
    let ollama = OllamaClient::from_config(&config)
        .map_err(|e| format!("Invalid inference URL '{}': {}", config.base_url, e))?;
    info!("Inference endpoint: {}", ollama.generate_url());

    let inference: Arc<dyn InferenceClient> = Arc::new(ollama);
    let extractor: Arc<dyn PdfTextExtractor> = Arc::new(PdfExtractClient::new());

    Ok(AppState {
        chat: Arc::new(
            ChatRelayService::new(inference.clone(), config.model.clone(), args.chat_timeout())
        ),
        summarize: Arc::new(
            SummarizeRelayService::new(inference, extractor, config.model, args.summarize_timeout())
        ),
    })
}

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    match args.command() {
        Command::Serve => serve(args).await,
        Command::Chat { backend_url } => {
            let api = HttpRelayApi::new(&backend_url)
                .map_err(|e| format!("Invalid backend URL '{}': {}", backend_url, e))?;
            client::terminal::run_terminal(Arc::new(api)).await
        }
    }
}

async fn serve(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Inference URL: {}", args.inference_url);
    info!("Model: {}", args.model);
    info!("Chat Timeout: {}s", args.chat_timeout_secs);
    info!("Summarize Timeout: {}s", args.summarize_timeout_secs);
    info!("Max Upload Bytes: {}", args.max_upload_bytes);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let state = build_state(&args)?;
    let addr = args.server_addr.clone();
    let server = Server::new(addr, state, args);
    server.run().await?;

    Ok(())
}
