//! Error types for markpage

use std::path::PathBuf;

use thiserror::Error;

use crate::boundary::TargetId;

/// Result type for markpage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Any error raised by markpage
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Why a conversion produced no record
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Another conversion is still running
    #[error("A conversion is already in progress")]
    Busy,

    #[error("No active tab found")]
    NoActiveTarget,

    /// The extraction call itself could not be completed
    #[error("Failed to get page content: {0}")]
    ScriptExecutionFailure(#[from] BoundaryError),

    /// The extractor ran and reported a failure
    #[error("Failed to extract content: {0}")]
    ContentExtractionFailure(String),
}

/// Failure of the extraction call across the target boundary
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("target {0} is no longer available")]
    TargetGone(TargetId),

    #[error("cannot access contents of {0}")]
    PermissionDenied(String),

    #[error("extraction task failed: {0}")]
    Task(String),

    #[error("invalid extraction response: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Failure to snapshot an extraction target
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("document is no longer reachable")]
    Unreachable,

    #[error("invalid document location: {0}")]
    Location(#[from] url::ParseError),
}

/// Why a frame's document could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameAccessError {
    #[error("blocked cross-origin frame {0}")]
    CrossOrigin(String),

    #[error("frame {0} has no loaded document")]
    NotLoaded(String),

    #[error("frame was detached from the document")]
    Detached,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid stored record: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("store path {0} does not name a file")]
    InvalidPath(PathBuf),
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard write failed: {0}")]
    WriteFailure(String),

    #[error("no clipboard available")]
    Unavailable,
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to write {path}: {source}")]
    DownloadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
