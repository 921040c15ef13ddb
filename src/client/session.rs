use std::sync::Arc;
use tokio::sync::{ Mutex, Notify };
use tokio::task::JoinHandle;
use crate::models::chat::PdfUpload;
use super::{ ClientInteractionState, Notification, RelayApi };

/// Drives a `ClientInteractionState` against a `RelayApi`.
///
/// Every relay call runs on its own task. Outcomes are applied as they
/// arrive, so two overlapping uploads resolve last-response-wins.
#[derive(Clone)]
pub struct ChatSession {
    api: Arc<dyn RelayApi>,
    state: Arc<Mutex<ClientInteractionState>>,
    changed: Arc<Notify>,
}

impl ChatSession {
    pub fn new(api: Arc<dyn RelayApi>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(ClientInteractionState::new())),
            changed: Arc::new(Notify::new()),
        }
    }

    /// Returns `None` when the message was rejected locally.
    pub async fn send_message(&self, text: &str) -> Option<JoinHandle<()>> {
        let accepted = self.state.lock().await.submit_message(text);
        self.changed.notify_one();
        let message = accepted?;

        let session = self.clone();
        Some(
            tokio::spawn(async move {
                let outcome = session.api.chat(&message).await;
                session.state.lock().await.complete_chat(outcome);
                session.changed.notify_one();
            })
        )
    }

    pub async fn upload_pdf(&self, upload: PdfUpload) -> JoinHandle<()> {
        let upload = self.state.lock().await.submit_pdf(upload);
        self.changed.notify_one();

        let session = self.clone();
        tokio::spawn(async move {
            let outcome = session.api.summarize(upload).await;
            session.state.lock().await.complete_summarize(outcome);
            session.changed.notify_one();
        })
    }

    pub async fn snapshot(&self) -> ClientInteractionState {
        self.state.lock().await.clone()
    }

    pub async fn drain_notifications(&self) -> Vec<Notification> {
        self.state.lock().await.drain_notifications()
    }

    /// Resolves after the next state change. A change that happened while
    /// nobody was waiting is still observed once.
    pub async fn changed(&self) {
        self.changed.notified().await
    }
}
