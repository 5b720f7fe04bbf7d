//! "Ask the user for a line of text", independent of where the user is.

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{Mutex as AsyncMutex, mpsc};

/// What to ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub title: String,
    pub message: String,
    pub placeholder: Option<String>,
    /// Hide the typed text where the front end can.
    pub secret: bool,
}

impl PromptRequest {
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            placeholder: None,
            secret: false,
        }
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }
}

/// Request a line of text. `None` means the user cancelled.
#[async_trait]
pub trait TextPrompt: Send + Sync {
    async fn request_text(&self, request: PromptRequest) -> Option<String>;
}

/// Line-based prompt over a stream of input lines (stdin in the binary).
///
/// An empty line or end of input cancels. The same lines can be taken back
/// with [`TerminalPrompt::into_lines`] once prompting is done.
pub struct TerminalPrompt {
    input: AsyncMutex<mpsc::UnboundedReceiver<String>>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl TerminalPrompt {
    #[must_use]
    pub fn new(
        input: mpsc::UnboundedReceiver<String>,
        output: impl Write + Send + 'static,
    ) -> Self {
        Self {
            input: AsyncMutex::new(input),
            output: Mutex::new(Box::new(output)),
        }
    }

    /// Hand the remaining input lines to the next reader.
    #[must_use]
    pub fn into_lines(self) -> mpsc::UnboundedReceiver<String> {
        self.input.into_inner()
    }

    fn show(&self, request: &PromptRequest) -> std::io::Result<()> {
        let mut out = self
            .output
            .lock()
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        write!(out, "{}: {}", request.title, request.message)?;
        if let Some(placeholder) = &request.placeholder {
            write!(out, " [{placeholder}]")?;
        }
        write!(out, "> ")?;
        out.flush()
    }
}

#[async_trait]
impl TextPrompt for TerminalPrompt {
    async fn request_text(&self, request: PromptRequest) -> Option<String> {
        if let Err(err) = self.show(&request) {
            log::warn!("terminal prompt failed: {err}");
            return None;
        }
        let line = self.input.lock().await.recv().await?;
        let answer = line.trim();
        (!answer.is_empty()).then(|| answer.to_string())
    }
}
