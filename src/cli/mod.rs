use clap::{ Parser, Subcommand };
use std::time::Duration;
use crate::llm::InferenceConfig;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    // --- Inference Server Args ---
    /// Base URL of the inference server; `/api/generate` is appended.
    #[arg(long, env = "INFERENCE_URL", default_value = "http://localhost:11434")]
    pub inference_url: String,

    /// Model identifier sent with every generate request.
    #[arg(long, env = "INFERENCE_MODEL", default_value = "deepseek-r1:7b")]
    pub model: String,

    /// Seconds before a chat generation call is abandoned.
    #[arg(long, env = "CHAT_TIMEOUT_SECS", default_value = "60")]
    pub chat_timeout_secs: u64,

    /// Seconds before a summarization call is abandoned.
    #[arg(long, env = "SUMMARIZE_TIMEOUT_SECS", default_value = "120")]
    pub summarize_timeout_secs: u64,

    // --- HTTP Server Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:5000")]
    pub server_addr: String,

    /// Largest accepted PDF upload request body, in bytes.
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value = "20971520")]
    pub max_upload_bytes: usize,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP backend (default).
    Serve,
    /// Chat with a running backend from the terminal.
    Chat {
        /// Base URL of the backend, e.g. http://127.0.0.1:5000
        #[arg(long, env = "BACKEND_URL", default_value = "http://127.0.0.1:5000")]
        backend_url: String,
    },
}

impl Args {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }

    pub fn inference_config(&self) -> InferenceConfig {
        InferenceConfig {
            base_url: self.inference_url.clone(),
            model: self.model.clone(),
        }
    }

    pub fn chat_timeout(&self) -> Duration {
        Duration::from_secs(self.chat_timeout_secs)
    }

    pub fn summarize_timeout(&self) -> Duration {
        Duration::from_secs(self.summarize_timeout_secs)
    }
}
