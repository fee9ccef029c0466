//! Handing converted Markdown to the user: clipboard and file download.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::fs;
use tracing::debug;

use crate::error::{ClipboardError, DownloadError};

pub const MARKDOWN_MIME: &str = "text/markdown";

/// Name of a downloaded file, `webpage-<timestamp>.md`, where the timestamp
/// is the ISO-8601 instant with `:` and `.` replaced by `-`.
pub fn download_filename(at: DateTime<Utc>) -> String {
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("webpage-{stamp}.md")
}

/// Write `markdown` into `dir` under [`download_filename`]
pub async fn download(dir: &Path, markdown: &str, at: DateTime<Utc>) -> Result<PathBuf, DownloadError> {
    let path = dir.join(download_filename(at));
    fs::write(&path, markdown)
        .await
        .map_err(|source| DownloadError::DownloadFailure {
            path: path.clone(),
            source,
        })?;
    debug!(path = %path.display(), bytes = markdown.len(), "downloaded markdown");
    Ok(path)
}

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

pub fn copy_to_clipboard<C>(clipboard: &C, markdown: &str) -> Result<(), ClipboardError>
where
    C: Clipboard + ?Sized,
{
    clipboard.write_text(markdown)?;
    debug!(bytes = markdown.len(), "copied markdown to clipboard");
    Ok(())
}

/// A clipboard that keeps the last written text
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock still guards a whole `Option<String>`
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut contents = self.contents.lock().unwrap_or_else(PoisonError::into_inner);
        *contents = Some(text.to_string());
        Ok(())
    }
}

/// The clipboard of an environment that has none
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_year() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_download_filename() {
        assert_eq!(
            download_filename(new_year()),
            "webpage-2024-01-01T00-00-00-000Z.md"
        );
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = download(dir.path(), "# Hi", new_year()).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "webpage-2024-01-01T00-00-00-000Z.md");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Hi");
    }

    #[tokio::test]
    async fn test_download_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = download(&dir.path().join("nope"), "x", new_year())
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("failed to write "));
    }

    #[test]
    fn test_clipboard_survives_poisoned_lock() {
        let clipboard = std::sync::Arc::new(MemoryClipboard::new());
        clipboard.write_text("before").unwrap();

        let poisoner = clipboard.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.contents.lock().unwrap();
            panic!("writer panicked");
        })
        .join();
        assert!(clipboard.contents.is_poisoned());

        assert_eq!(clipboard.contents().as_deref(), Some("before"));
        clipboard.write_text("after").unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("after"));
    }

    #[test]
    fn test_copy_to_clipboard() {
        let clipboard = MemoryClipboard::new();
        copy_to_clipboard(&clipboard, "# Hi").unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("# Hi"));
        assert!(matches!(
            copy_to_clipboard(&NoClipboard, "x"),
            Err(ClipboardError::Unavailable)
        ));
    }
}
