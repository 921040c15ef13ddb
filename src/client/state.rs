use std::collections::VecDeque;
use crate::models::chat::{ ChatTurn, ConversationLog, PdfUpload, Speaker, SummaryResult };
use super::ClientError;

pub const EMPTY_MESSAGE_WARNING: &str = "You need to write something in the chat!";
pub const CHAT_FAILED_NOTICE: &str = "Failed to send message. Try again.";
pub const PDF_UPLOADED_NOTICE: &str = "PDF uploaded successfully!";
pub const PDF_FAILED_NOTICE: &str = "Failed to upload PDF. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notification {
    fn new(level: NoticeLevel, text: &str) -> Self {
        Self { level, text: text.to_string() }
    }
}

/// UI-side view of one chat session.
///
/// Chat and summarize calls share a single busy flag. Submissions are not
/// blocked while busy, so completions apply in arrival order and the first
/// one to land returns the state to `Idle`.
#[derive(Debug, Clone, Default)]
pub struct ClientInteractionState {
    log: ConversationLog,
    input: String,
    file_name: Option<String>,
    summary: Option<SummaryResult>,
    busy: bool,
    notifications: VecDeque<Notification>,
}

impl ClientInteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Submits whatever is in the input buffer, clearing it once accepted.
    pub fn submit_input(&mut self) -> Option<String> {
        let text = self.input.clone();
        let accepted = self.submit_message(&text);
        if accepted.is_some() {
            self.input.clear();
        }
        accepted
    }

    /// Appends the user turn optimistically and returns the message to relay.
    /// Blank text raises a warning and leaves the state untouched.
    pub fn submit_message(&mut self, text: &str) -> Option<String> {
        if !self.log.push(ChatTurn::new(Speaker::User, text)) {
            self.notify(NoticeLevel::Warning, EMPTY_MESSAGE_WARNING);
            return None;
        }
        self.busy = true;
        Some(text.to_string())
    }

    /// Applies a chat outcome. A failed call keeps the user turn in the log.
    pub fn complete_chat(&mut self, outcome: Result<String, ClientError>) {
        match outcome {
            Ok(reply) => {
                self.log.push(ChatTurn::new(Speaker::Assistant, reply));
            }
            Err(e) => {
                log::warn!("Error sending message: {}", e);
                self.notify(NoticeLevel::Error, CHAT_FAILED_NOTICE);
            }
        }
        self.busy = false;
    }

    /// Records the file name and hands the upload back for relaying.
    pub fn submit_pdf(&mut self, upload: PdfUpload) -> PdfUpload {
        self.file_name = Some(upload.file_name.clone());
        self.busy = true;
        upload
    }

    /// Applies a summarize outcome. Failure leaves the previous summary in place.
    pub fn complete_summarize(&mut self, outcome: Result<String, ClientError>) {
        match outcome {
            Ok(summary) => {
                self.summary = Some(SummaryResult { text: summary });
                self.notify(NoticeLevel::Success, PDF_UPLOADED_NOTICE);
            }
            Err(e) => {
                log::warn!("Error uploading PDF: {}", e);
                self.notify(NoticeLevel::Error, PDF_FAILED_NOTICE);
            }
        }
        self.busy = false;
    }

    pub fn phase(&self) -> Phase {
        if self.busy { Phase::Busy } else { Phase::Idle }
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn summary(&self) -> Option<&SummaryResult> {
        self.summary.as_ref()
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    fn notify(&mut self, level: NoticeLevel, text: &str) {
        self.notifications.push_back(Notification::new(level, text));
    }
}
