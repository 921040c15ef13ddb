use std::error::Error;
use std::path::{ Path, PathBuf };
use std::sync::Arc;
use tokio::io::{ AsyncBufReadExt, BufReader };
use crate::models::chat::PdfUpload;
use super::{ ChatSession, ClientInteractionState, NoticeLevel, Phase, RelayApi };

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalInput {
    Message(String),
    Pdf(PathBuf),
    Quit,
}

pub fn parse_line(line: &str) -> TerminalInput {
    let trimmed = line.trim();
    if trimmed == "/quit" || trimmed == "/exit" {
        return TerminalInput::Quit;
    }
    if let Some(path) = trimmed.strip_prefix("/pdf ") {
        return TerminalInput::Pdf(PathBuf::from(path.trim()));
    }
    TerminalInput::Message(line.to_string())
}

/// Tracks what has already been printed.
#[derive(Default)]
struct Renderer {
    turns_shown: usize,
    summary_shown: Option<String>,
    phase: Option<Phase>,
}

impl Renderer {
    fn render(&mut self, state: &ClientInteractionState) {
        for turn in &state.log().turns()[self.turns_shown..] {
            println!("[{}] {}", turn.timestamp().format("%H:%M:%S"), turn);
        }
        self.turns_shown = state.log().len();

        let summary = state.summary().map(|s| s.text.clone());
        if summary.is_some() && summary != self.summary_shown {
            println!("PDF Summary ({}):", state.file_name().unwrap_or("unknown"));
            println!("{}", summary.as_deref().unwrap_or_default());
            self.summary_shown = summary;
        }

        if self.phase != Some(state.phase()) && state.phase() == Phase::Busy {
            println!("...");
        }
        self.phase = Some(state.phase());
    }
}

async fn read_upload(path: &Path) -> std::io::Result<PdfUpload> {
    let content = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.pdf".to_string());
    Ok(PdfUpload::new(content, file_name))
}

pub async fn run_terminal(api: Arc<dyn RelayApi>) -> Result<(), Box<dyn Error + Send + Sync>> {
    let session = ChatSession::new(api);
    let mut renderer = Renderer::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Type a message, `/pdf <path>` to summarize a PDF, `/quit` to exit.");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line) {
                    TerminalInput::Quit => break,
                    TerminalInput::Message(text) => {
                        session.send_message(&text).await;
                    }
                    TerminalInput::Pdf(path) => match read_upload(&path).await {
                        Ok(upload) => {
                            session.upload_pdf(upload).await;
                        }
                        Err(e) => eprintln!("Cannot read {}: {}", path.display(), e),
                    },
                }
            }
            _ = session.changed() => {
                renderer.render(&session.snapshot().await);
                for notice in session.drain_notifications().await {
                    match notice.level {
                        NoticeLevel::Success => println!("✓ {}", notice.text),
                        NoticeLevel::Warning | NoticeLevel::Error => eprintln!("! {}", notice.text),
                    }
                }
            }
        }
    }

    Ok(())
}
