//! # markpage
//!
//! Extract the main content of a rendered web page and convert it to
//! Markdown.
//!
//! ## Pipeline
//!
//! ```text
//! target ──snapshot──▶ Document ──prune/select──▶ content ─┐
//!                         │                                 ├─▶ MarkdownRuleEngine ──▶ ConversionRecord
//!                         └──frames──▶ FrameFragment* ──────┘
//! ```
//!
//! Every stage works on an owned [`Node`] snapshot, so nothing downstream
//! can alter the document it was taken from.
//!
//! ## Example (HTML string)
//!
//! ```rust
//! use markpage::MarkdownRuleEngine;
//!
//! let engine = MarkdownRuleEngine::page();
//! let markdown = engine.serialize_html("<h1>Test Page</h1><p>Hello <b>World</b></p>");
//! assert_eq!(markdown, "# Test Page\n\nHello **World**");
//! ```
//!
//! ## Example (extraction)
//!
//! ```rust
//! use markpage::extract::{extract, ExtractOptions, ExtractionResult, Page};
//!
//! let page = Page::parse(
//!     "https://example.com/post",
//!     "<title>Post</title><nav>Menu</nav><article><p>Story</p></article>",
//! )
//! .unwrap();
//!
//! let result = extract(&page, &ExtractOptions::default());
//! assert_eq!(result, ExtractionResult::success("Post", "<p>Story</p>"));
//! ```

pub mod boundary;
mod conversion;
mod convert;
mod engine;
pub mod error;
pub mod export;
pub mod extract;
mod html;
mod node;
pub mod rules;
pub mod session;
pub mod store;
pub mod utilities;

pub use markpage_core::{Block, CodeBlockStyle, HeadingStyle, Inline, ListItem, Options};

pub use boundary::{ExtractionBoundary, ExtractionRequest, LocalBoundary, Target, TargetId};
pub use conversion::{ConversionRecord, Converter, CONTENT_CONTAINER_CLASS};
pub use engine::MarkdownRuleEngine;
pub use error::{ConversionError, Error, Result};
pub use extract::{Document, ExtractOptions, ExtractionResult, Page};
pub use html::{parse_document, parse_html};
pub use node::{Descendants, Node, NodeType};
pub use session::Session;
pub use store::{ConversionStore, JsonFileStore, MemoryStore};
