//! Markdown syntax tree
//!
//! The converter in `markpage` lowers a DOM snapshot into these nodes;
//! [`crate::serialize`] turns them into text.

/// A block-level Markdown node
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Sequence of blocks with no markup of its own
    Document(Vec<Block>),

    /// Heading with level (1-6) and inline content
    Heading { level: u8, content: Vec<Inline> },

    Paragraph(Vec<Inline>),

    BlockQuote(Vec<Block>),

    /// Ordered or unordered list
    List {
        ordered: bool,
        start: u32,
        items: Vec<ListItem>,
    },

    CodeBlock {
        language: Option<String>,
        code: String,
        fenced: bool,
    },

    /// Horizontal rule
    ThematicBreak,

    Table {
        headers: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
    },

    /// Image reference followed by its caption on the next line
    Figure {
        alt: String,
        url: String,
        caption: String,
    },

    /// Markup emitted verbatim
    HtmlBlock(String),
}

/// A list item containing blocks
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub content: Vec<Block>,
}

impl ListItem {
    pub fn new(content: Vec<Block>) -> Self {
        Self { content }
    }

    pub fn from_inlines(inlines: Vec<Inline>) -> Self {
        Self {
            content: vec![Block::Paragraph(inlines)],
        }
    }

    pub fn is_blank(&self) -> bool {
        self.content.iter().all(Block::is_blank)
    }
}

/// An inline Markdown node
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    /// Text, already escaped for Markdown
    Text(String),

    Strong(Vec<Inline>),

    Emphasis(Vec<Inline>),

    /// Inline code span (raw, unescaped)
    Code(String),

    Link {
        content: Vec<Inline>,
        url: String,
        title: Option<String>,
    },

    Image {
        alt: String,
        url: String,
        title: Option<String>,
    },

    /// Hard line break
    LineBreak,

    /// Markup emitted verbatim inside a line
    HtmlInline(String),
}

impl Block {
    /// True when serializing this block would produce no text
    pub fn is_blank(&self) -> bool {
        match self {
            Block::Document(blocks) | Block::BlockQuote(blocks) => {
                blocks.iter().all(Block::is_blank)
            }
            Block::Paragraph(inlines) | Block::Heading { content: inlines, .. } => {
                inlines.iter().all(Inline::is_blank)
            }
            Block::List { items, .. } => items.iter().all(ListItem::is_blank),
            Block::CodeBlock { code, .. } => code.trim().is_empty(),
            Block::Table { headers, rows } => {
                headers.iter().all(|h| h.iter().all(Inline::is_blank))
                    && rows
                        .iter()
                        .all(|r| r.iter().all(|c| c.iter().all(Inline::is_blank)))
            }
            Block::ThematicBreak | Block::Figure { .. } => false,
            Block::HtmlBlock(html) => html.trim().is_empty(),
        }
    }
}

impl Inline {
    /// True when serializing this inline would produce only whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            Inline::Text(text) => text.trim().is_empty(),
            Inline::Strong(inlines) | Inline::Emphasis(inlines) => {
                inlines.iter().all(Inline::is_blank)
            }
            Inline::Code(code) => code.is_empty(),
            Inline::Link { content, .. } => content.iter().all(Inline::is_blank),
            Inline::Image { .. } | Inline::LineBreak => false,
            Inline::HtmlInline(html) => html.trim().is_empty(),
        }
    }

    /// Rendered width, used to pad table columns
    pub fn text_len(&self) -> usize {
        match self {
            Inline::Text(text) => text.chars().count(),
            Inline::Strong(inlines) => inlines_text_len(inlines) + 4,
            Inline::Emphasis(inlines) => inlines_text_len(inlines) + 2,
            Inline::Code(code) => code.chars().count() + 2,
            Inline::Link { content, url, .. } => {
                inlines_text_len(content) + url.chars().count() + 4
            }
            Inline::Image { alt, url, .. } => alt.chars().count() + url.chars().count() + 5,
            Inline::LineBreak => 0,
            Inline::HtmlInline(html) => html.chars().count(),
        }
    }
}

/// Sum of [`Inline::text_len`] over a run of inlines
pub fn inlines_text_len(inlines: &[Inline]) -> usize {
    inlines.iter().map(Inline::text_len).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figure_is_never_blank() {
        let figure = Block::Figure {
            alt: String::new(),
            url: String::new(),
            caption: String::new(),
        };
        assert!(!figure.is_blank());
    }

    #[test]
    fn test_whitespace_paragraph_is_blank() {
        let block = Block::Paragraph(vec![Inline::Text("  ".to_string())]);
        assert!(block.is_blank());
    }

    #[test]
    fn test_link_width_counts_url() {
        let link = Inline::Link {
            content: vec![Inline::Text("ab".to_string())],
            url: "x".to_string(),
            title: None,
        };
        assert_eq!(link.text_len(), 7);
    }
}
