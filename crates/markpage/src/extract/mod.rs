//! Main-content extraction.
//!
//! [`extract`] turns an [`ExtractionTarget`] into an [`ExtractionResult`]:
//! readable frames are inlined from the original snapshot, the snapshot is
//! pruned of navigation and other noise, and the main content container is
//! selected. The result is always a value; failures are reported as
//! [`ExtractionResult::Failure`] rather than raised.

mod document;
mod frames;
mod prune;
mod result;
mod select;
mod selector;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use document::{Document, ExtractionTarget, Page, FRAME_TAGS};
pub use frames::{inline, FrameAccess, FrameFragment, FrameStore, NoFrames, FRAME_CONTAINER_CLASS};
pub use prune::{prune, prune_frame, prune_with, FRAME_NOISE, PAGE_NOISE};
pub use result::ExtractionResult;
pub use select::{main_content, select, MAIN_CONTENT};
pub use selector::Selector;

/// Heading placed before inlined frame content
pub const EMBEDDED_HEADING: &str = "Embedded Content";

/// Separator between inlined frame fragments
pub const FRAME_SEPARATOR: &str = "<hr>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractOptions {
    /// Append the content of readable embedded frames
    pub include_frames: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            include_frames: true,
        }
    }
}

/// Extract the main content of `target`
pub fn extract<T>(target: &T, options: &ExtractOptions) -> ExtractionResult
where
    T: ExtractionTarget + ?Sized,
{
    let document = match target.snapshot() {
        Ok(document) => document,
        Err(error) => {
            warn!(location = target.location(), %error, "snapshot failed");
            return ExtractionResult::failure(error.to_string());
        }
    };

    // Frames are read before pruning, which may drop their containers.
    let fragments = if options.include_frames {
        inline(&document, target)
    } else {
        Vec::new()
    };

    let pruned = prune(&document.root);
    let mut content = select(&pruned);

    if !fragments.is_empty() {
        debug!(frames = fragments.len(), "appending embedded content");
        content.push_str(&format!("<h2>{EMBEDDED_HEADING}</h2>"));
        let markup: Vec<&str> = fragments.iter().map(|f| f.markup.as_str()).collect();
        content.push_str(&markup.join(FRAME_SEPARATOR));
    }

    ExtractionResult::success(document.title, content)
}
