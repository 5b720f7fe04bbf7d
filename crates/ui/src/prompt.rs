//! Text prompt rendered as a modal dialog by `PromptHost`.

use std::sync::Mutex;

use async_trait::async_trait;
use services::{PromptRequest, TextPrompt};
use tokio::sync::{mpsc, oneshot};

/// A question waiting for the dialog to answer it.
pub struct PendingPrompt {
    request: PromptRequest,
    reply: oneshot::Sender<Option<String>>,
}

impl PendingPrompt {
    #[must_use]
    pub fn request(&self) -> &PromptRequest {
        &self.request
    }

    /// Reply with the typed text. Blank input counts as a cancel.
    pub fn answer(self, text: &str) {
        let text = text.trim();
        let _ = self.reply.send((!text.is_empty()).then(|| text.to_string()));
    }

    pub fn cancel(self) {
        let _ = self.reply.send(None);
    }
}

/// `TextPrompt` for the desktop UI. Requests are queued until the host picks
/// them up; a dropped host cancels every waiting request.
pub struct ModalPrompt {
    sender: mpsc::UnboundedSender<PendingPrompt>,
    receiver: Mutex<Option<mpsc::UnboundedReceiver<PendingPrompt>>>,
}

impl ModalPrompt {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(Some(receiver)),
        }
    }

    /// The queue of pending requests. Only the first caller gets it.
    pub fn take_receiver(&self) -> Option<mpsc::UnboundedReceiver<PendingPrompt>> {
        match self.receiver.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

impl Default for ModalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextPrompt for ModalPrompt {
    async fn request_text(&self, request: PromptRequest) -> Option<String> {
        let (reply, answer) = oneshot::channel();
        if self.sender.send(PendingPrompt { request, reply }).is_err() {
            log::warn!("prompt requested with no dialog host");
            return None;
        }
        answer.await.ok().flatten()
    }
}
