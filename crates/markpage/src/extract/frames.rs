//! Inlining of embedded frame documents.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use super::document::Document;
use super::prune::prune_frame;
use crate::error::FrameAccessError;
use crate::html::parse_document;
use crate::node::Node;

/// Class of the container wrapping each inlined frame
pub const FRAME_CONTAINER_CLASS: &str = "iframe-content";

/// Access to the documents of a page's embedded frames
pub trait FrameAccess {
    /// A copy of the body of the document loaded in `frame`
    fn frame_body(&self, frame: &Node) -> Result<Node, FrameAccessError>;
}

/// A page whose frames are never readable
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFrames;

impl FrameAccess for NoFrames {
    fn frame_body(&self, frame: &Node) -> Result<Node, FrameAccessError> {
        Err(FrameAccessError::NotLoaded(
            frame.attr("src").unwrap_or_default().to_string(),
        ))
    }
}

/// Frame documents of a page, keyed by their resolved URL.
///
/// Lookups apply the same-origin policy against the page URL: a frame
/// whose source resolves to another origin is reported as
/// [`FrameAccessError::CrossOrigin`] even when its document is known.
#[derive(Debug, Clone)]
pub struct FrameStore {
    base: Url,
    documents: HashMap<String, Node>,
}

impl FrameStore {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            documents: HashMap::new(),
        }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Register the document served at `src`, relative to the page URL
    pub fn insert(&mut self, src: &str, html: &str) -> Result<Url, url::ParseError> {
        let url = self.base.join(src.trim())?;
        debug!(frame = %url, "registered frame document");
        self.documents.insert(url.to_string(), parse_document(html));
        Ok(url)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FrameAccess for FrameStore {
    fn frame_body(&self, frame: &Node) -> Result<Node, FrameAccessError> {
        if let Some(srcdoc) = frame.attr("srcdoc") {
            return Ok(body_or_root(&parse_document(srcdoc)));
        }

        let src = frame.attr("src").map(str::trim).unwrap_or_default();
        if src.is_empty() || src == "about:blank" {
            return Ok(Node::element("body"));
        }

        let url = self
            .base
            .join(src)
            .map_err(|_| FrameAccessError::NotLoaded(src.to_string()))?;
        if !same_origin(&self.base, &url) {
            return Err(FrameAccessError::CrossOrigin(url.to_string()));
        }

        self.documents
            .get(url.as_str())
            .map(body_or_root)
            .ok_or_else(|| FrameAccessError::NotLoaded(url.to_string()))
    }
}

// Local files share one origin here; `Url::origin` makes each of them opaque.
fn same_origin(a: &Url, b: &Url) -> bool {
    if a.scheme() == "file" && b.scheme() == "file" {
        return true;
    }
    a.origin() == b.origin()
}

fn body_or_root(document: &Node) -> Node {
    document
        .find_first(|n| n.tag_name() == "body")
        .unwrap_or(document)
        .clone()
}

/// The pruned markup of one embedded frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameFragment {
    pub markup: String,
}

impl FrameFragment {
    /// Prune a frame body and wrap its content in the frame container
    pub fn from_body(body: &Node) -> Self {
        let pruned = prune_frame(body);
        Self {
            markup: format!(
                "<div class=\"{FRAME_CONTAINER_CLASS}\">{}</div>",
                pruned.inner_html()
            ),
        }
    }
}

/// One fragment per readable frame of `document`, in document order.
///
/// Frames that cannot be read are logged and skipped; they never fail the
/// whole inlining pass.
pub fn inline<F>(document: &Document, access: &F) -> Vec<FrameFragment>
where
    F: FrameAccess + ?Sized,
{
    document
        .frames()
        .enumerate()
        .filter_map(|(index, frame)| match access.frame_body(frame) {
            Ok(body) => Some(FrameFragment::from_body(&body)),
            Err(error) => {
                warn!(index, %error, "skipping embedded frame");
                None
            }
        })
        .collect()
}
