use std::{fs, path::PathBuf};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard access denied")]
    Denied,
    #[error("no clipboard available")]
    Unsupported,
    #[error("clipboard write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Somewhere the copy text can be handed off to.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Writes the text to a file, for hosts without a system clipboard.
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ClipboardSink for FileClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        fs::write(&self.path, text)?;
        Ok(())
    }
}

/// Always refuses; the caller falls back to showing the text.
pub struct NoClipboard;

impl ClipboardSink for NoClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unsupported)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// The text the user has to copy by hand.
    Manual(String),
}

/// Hand `text` to `sink`; on any failure return it for manual copy.
pub fn export_summary(sink: &mut dyn ClipboardSink, text: &str) -> CopyOutcome {
    match sink.write_text(text) {
        Ok(()) => {
            info!(bytes = text.len(), "summary copied");
            CopyOutcome::Copied
        }
        Err(e) => {
            warn!(error = %e, "clipboard unavailable, falling back to manual copy");
            CopyOutcome::Manual(text.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    struct Denying;

    impl ClipboardSink for Denying {
        fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Denied)
        }
    }

    #[test]
    fn file_sink_receives_text() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("copy.txt");
        let mut sink = FileClipboard::new(&path);
        assert_eq!(export_summary(&mut sink, "hello"), CopyOutcome::Copied);
        assert_eq!(fs::read_to_string(&path)?, "hello");
        Ok(())
    }

    #[test]
    fn failures_fall_back_to_manual_copy() {
        assert_eq!(
            export_summary(&mut Denying, "text"),
            CopyOutcome::Manual("text".into())
        );
        assert_eq!(
            export_summary(&mut NoClipboard, "x"),
            CopyOutcome::Manual("x".into())
        );

        let mut missing_dir = FileClipboard::new("/nonexistent-dir/for/sure/copy.txt");
        assert!(matches!(
            export_summary(&mut missing_dir, "y"),
            CopyOutcome::Manual(_)
        ));
    }
}
