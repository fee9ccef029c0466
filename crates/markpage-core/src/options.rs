//! Configuration options for Markdown serialization

/// Heading style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// Underlined with `=` or `-`.
    /// Only works for h1 and h2, falls back to ATX for h3-h6
    #[default]
    Setext,
    /// Prefixed with a run of `#`
    Atx,
}

/// Code block style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeBlockStyle {
    /// Indented by 4 spaces
    #[default]
    Indented,
    /// Delimited by fence lines
    Fenced,
}

/// Options for Markdown serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub heading_style: HeadingStyle,

    /// Horizontal rule string
    pub hr: String,

    pub bullet_list_marker: char,

    pub code_block_style: CodeBlockStyle,

    /// Fence string for fenced code blocks
    pub fence: String,

    pub em_delimiter: char,

    pub strong_delimiter: String,
}

impl Options {
    /// The fixed option table used for page conversion:
    ///
    /// | option             | value   |
    /// |--------------------|---------|
    /// | heading style      | ATX     |
    /// | hr                 | `---`   |
    /// | bullet list marker | `-`     |
    /// | code block style   | fenced  |
    /// | emphasis delimiter | `_`     |
    pub fn page() -> Self {
        Self {
            heading_style: HeadingStyle::Atx,
            hr: "---".to_string(),
            bullet_list_marker: '-',
            code_block_style: CodeBlockStyle::Fenced,
            em_delimiter: '_',
            ..Self::default()
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Setext,
            hr: "* * *".to_string(),
            bullet_list_marker: '*',
            code_block_style: CodeBlockStyle::Indented,
            fence: "```".to_string(),
            em_delimiter: '_',
            strong_delimiter: "**".to_string(),
        }
    }
}
