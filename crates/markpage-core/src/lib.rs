//! markpage-core - Markdown AST and serialization
//!
//! This crate holds the Markdown side of markpage: the syntax tree the
//! converter produces and the serializer that renders it. It knows nothing
//! about HTML.
//!
//! # Architecture
//!
//! ```text
//! DOM snapshot ──convert──▶ ┌──────────────┐
//!                           │ Markdown AST │ ──serialize──▶ Markdown String
//!                           └──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use markpage_core::{Block, Inline, Options, serialize};
//!
//! let ast = Block::Document(vec![
//!     Block::Heading {
//!         level: 1,
//!         content: vec![Inline::Text("Test Page".to_string())],
//!     },
//!     Block::Paragraph(vec![
//!         Inline::Text("Hello ".to_string()),
//!         Inline::Strong(vec![Inline::Text("World".to_string())]),
//!     ]),
//! ]);
//!
//! let markdown = serialize(&ast, &Options::page());
//! assert_eq!(markdown, "# Test Page\n\nHello **World**");
//! ```

mod ast;
mod options;
mod serialize;

pub use ast::{inlines_text_len, Block, Inline, ListItem};
pub use options::{CodeBlockStyle, HeadingStyle, Options};
pub use serialize::serialize;
