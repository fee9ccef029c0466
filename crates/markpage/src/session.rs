//! State of an interactive conversion surface: the converted output, which
//! follow-up actions are available, and a transient status line.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::{debug, error};

use crate::conversion::{ConversionRecord, Converter};
use crate::error::{ClipboardError, ConversionError, DownloadError};
use crate::export::{self, Clipboard};

/// How long success and error messages stay visible
pub const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub level: StatusLevel,
    /// `None` keeps the message until it is replaced
    pub expires_at: Option<Instant>,
}

impl Status {
    fn info(message: &str) -> Self {
        Self {
            message: message.to_string(),
            level: StatusLevel::Info,
            expires_at: None,
        }
    }

    fn transient(message: impl Into<String>, level: StatusLevel) -> Self {
        Self {
            message: message.into(),
            level,
            expires_at: Some(Instant::now() + STATUS_CLEAR_DELAY),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.expires_at.map_or(true, |at| Instant::now() < at)
    }
}

pub struct Session {
    converter: Arc<Converter>,
    clipboard: Arc<dyn Clipboard>,
    download_dir: PathBuf,
    output: String,
    copy_enabled: bool,
    download_enabled: bool,
    status: Option<Status>,
}

impl Session {
    pub fn new(converter: Arc<Converter>, clipboard: Arc<dyn Clipboard>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            converter,
            clipboard,
            download_dir: download_dir.into(),
            output: String::new(),
            copy_enabled: false,
            download_enabled: false,
            status: None,
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn copy_enabled(&self) -> bool {
        self.copy_enabled
    }

    pub fn download_enabled(&self) -> bool {
        self.download_enabled
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// The current status, if it has not cleared yet
    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref().filter(|s| s.is_visible())
    }

    pub async fn convert(&mut self) -> Result<ConversionRecord, ConversionError> {
        self.status = Some(Status::info("Converting..."));

        match self.converter.convert().await {
            Ok(record) => {
                self.output = record.markdown.clone();
                self.copy_enabled = true;
                self.download_enabled = true;
                self.status = Some(Status::transient("Conversion complete!", StatusLevel::Success));
                Ok(record)
            }
            Err(err) => {
                error!(error = %err, "conversion failed");
                self.output.clear();
                self.copy_enabled = false;
                self.download_enabled = false;
                self.status = Some(Status::transient(format!("Error: {err}"), StatusLevel::Error));
                Err(err)
            }
        }
    }

    /// Copy the output to the clipboard; does nothing while copying is
    /// disabled
    pub fn copy(&mut self) -> Result<(), ClipboardError> {
        if !self.copy_enabled {
            debug!("copy requested with no output");
            return Ok(());
        }

        match export::copy_to_clipboard(self.clipboard.as_ref(), &self.output) {
            Ok(()) => {
                self.status = Some(Status::transient("Copied to clipboard!", StatusLevel::Success));
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "copy failed");
                self.status = Some(Status::transient("Error copying to clipboard", StatusLevel::Error));
                Err(err)
            }
        }
    }

    /// Save the output into the download directory, named after `at`.
    /// Returns `None` while downloading is disabled.
    pub async fn download(&mut self, at: DateTime<Utc>) -> Result<Option<PathBuf>, DownloadError> {
        if !self.download_enabled {
            debug!("download requested with no output");
            return Ok(None);
        }

        match export::download(&self.download_dir, &self.output, at).await {
            Ok(path) => {
                self.status = Some(Status::transient("Downloaded successfully!", StatusLevel::Success));
                Ok(Some(path))
            }
            Err(err) => {
                error!(error = %err, "download failed");
                self.status = Some(Status::transient("Error downloading file", StatusLevel::Error));
                Err(err)
            }
        }
    }
}
