//! Clipboard sources

use arboard::Clipboard;
use async_trait::async_trait;
use tracing::debug;

use super::ClipboardSource;

/// The OS clipboard, read on a blocking task
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClipboardSource for SystemClipboard {
    async fn read_text(&self) -> Option<String> {
        let result = tokio::task::spawn_blocking(|| {
            let mut clipboard = Clipboard::new()?;
            clipboard.get_text()
        })
        .await;

        match result {
            Ok(Ok(text)) => Some(text),
            Ok(Err(e)) => {
                debug!("No plain text on the clipboard: {}", e);
                None
            }
            Err(e) => {
                debug!("Clipboard read task failed: {}", e);
                None
            }
        }
    }
}

/// A fixed clipboard payload, for tests and scripted use
#[derive(Debug, Default, Clone)]
pub struct StaticClipboard {
    text: Option<String>,
}

impl StaticClipboard {
    /// A clipboard holding `text`
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// A clipboard without plain text (e.g. holding an image)
    pub fn empty() -> Self {
        Self { text: None }
    }
}

#[async_trait]
impl ClipboardSource for StaticClipboard {
    async fn read_text(&self) -> Option<String> {
        self.text.clone()
    }
}
