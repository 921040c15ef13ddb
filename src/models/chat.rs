use axum::body::Bytes;
use chrono::{ DateTime, Utc };
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::User => write!(f, "You"),
            Speaker::Assistant => write!(f, "AI"),
        }
    }
}

/// One utterance in the conversation. Fields are private so a turn cannot
/// change after it is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatTurn {
    speaker: Speaker,
    text: String,
    timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self { speaker, text: text.into(), timestamp: Utc::now() }
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl fmt::Display for ChatTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.speaker, self.text)
    }
}

/// Append-only, in-memory conversation. Blank user turns are refused.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversationLog {
    turns: Vec<ChatTurn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `turn`, returning false when it is a user turn with blank text.
    pub fn push(&mut self, turn: ChatTurn) -> bool {
        if turn.speaker == Speaker::User && turn.text.trim().is_empty() {
            return false;
        }
        self.turns.push(turn);
        true
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryResult {
    pub text: String,
}

/// A PDF handed to the summarize route. Lives for one call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdfUpload {
    pub content: Bytes,
    pub file_name: String,
}

impl PdfUpload {
    pub fn new(content: impl Into<Bytes>, file_name: impl Into<String>) -> Self {
        Self { content: content.into(), file_name: file_name.into() }
    }
}
