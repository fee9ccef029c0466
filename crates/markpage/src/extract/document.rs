//! Document snapshots and the targets they are taken from.

use url::Url;

use super::frames::{FrameAccess, FrameStore};
use crate::error::{ExtractError, FrameAccessError};
use crate::html::parse_document;
use crate::node::Node;
use crate::utilities::collapse_whitespace;

/// Frame-hosting elements
pub const FRAME_TAGS: &[&str] = &["iframe", "frame"];

/// A snapshot of a rendered document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub url: String,
    pub root: Node,
}

impl Document {
    /// Snapshot an existing tree; the title is read from its `title` element
    pub fn new(url: &str, root: Node) -> Self {
        let title = root
            .find_first(|n| n.tag_name() == "title")
            .map(|t| collapse_whitespace(&t.text_content()).trim().to_string())
            .unwrap_or_default();
        Self {
            title,
            url: url.to_string(),
            root,
        }
    }

    pub fn parse(url: &str, html: &str) -> Self {
        Self::new(url, parse_document(html))
    }

    pub fn body(&self) -> Option<&Node> {
        self.root.find_first(|n| n.tag_name() == "body")
    }

    /// Frame elements in document order
    pub fn frames(&self) -> impl Iterator<Item = &Node> {
        self.root
            .descendants()
            .filter(|n| n.is_element() && FRAME_TAGS.contains(&n.tag_name()))
    }
}

/// Something a document snapshot can be taken from, such as an open tab.
pub trait ExtractionTarget: FrameAccess + Send + Sync {
    /// A fresh, independent snapshot of the current document
    fn snapshot(&self) -> Result<Document, ExtractError>;

    /// Current location of the target
    fn location(&self) -> &str;
}

/// A loaded page together with the documents of its frames
#[derive(Debug, Clone)]
pub struct Page {
    document: Document,
    frames: FrameStore,
}

impl Page {
    pub fn parse(url: &str, html: &str) -> Result<Self, ExtractError> {
        let base = Url::parse(url)?;
        Ok(Self {
            document: Document::parse(base.as_str(), html),
            frames: FrameStore::new(base),
        })
    }

    /// Register the document loaded by a frame whose source is `src`
    pub fn with_frame(mut self, src: &str, html: &str) -> Result<Self, ExtractError> {
        self.frames.insert(src, html)?;
        Ok(self)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn frames(&self) -> &FrameStore {
        &self.frames
    }
}

impl FrameAccess for Page {
    fn frame_body(&self, frame: &Node) -> Result<Node, FrameAccessError> {
        self.frames.frame_body(frame)
    }
}

impl ExtractionTarget for Page {
    fn snapshot(&self) -> Result<Document, ExtractError> {
        Ok(self.document.clone())
    }

    fn location(&self) -> &str {
        &self.document.url
    }
}
