//! Element classification and text helpers shared by the converter and the
//! DOM snapshot.

use once_cell::sync::Lazy;
use regex::Regex;

/// Block-level HTML elements
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "audio", "blockquote", "body", "canvas",
    "center", "dd", "details", "dialog", "dir", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "frameset", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hgroup", "hr", "html", "isindex", "li",
    "main", "menu", "nav", "noframes", "noscript", "ol", "output", "p", "pre",
    "section", "summary", "table", "tbody", "td", "tfoot", "th", "thead",
    "tr", "ul",
];

/// Void (self-closing) HTML elements
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text children are not entity-escaped when serialized
pub const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "iframe", "noembed", "noframes", "xmp", "plaintext",
];

/// Elements dropped by the CommonMark mapping unless a rule keeps them
pub const SKIPPED_ELEMENTS: &[&str] = &[
    "head", "title", "meta", "link", "base", "noscript", "template", "script",
    "style", "iframe", "frame",
];

pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag)
}

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

pub fn is_skipped(tag: &str) -> bool {
    SKIPPED_ELEMENTS.contains(&tag)
}

// Only ASCII whitespace collapses; a no-break space is content.
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\r\n\x0C]+").expect("whitespace pattern is valid"));

static LINE_START_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)([#>+\-=~])").expect("line start pattern is valid"));

static ORDERED_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*\d+)\.(\s)").expect("ordered marker pattern is valid"));

/// Collapse runs of ASCII whitespace into a single space
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").into_owned()
}

/// Escape inline delimiters (backslash, `*`, `_`, backtick, brackets) that
/// would otherwise be read as Markdown syntax
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\\' | '*' | '_' | '`' | '[' | ']' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    result
}

/// Escape a block marker (`#`, `>`, `-`, `+`, `=`, `~`, `1.`) at the start
/// of `text`. Only meaningful for text that begins a line.
pub fn escape_line_start(text: &str) -> String {
    let result = LINE_START_MARKER.replace(text, "$1\\$2");
    ORDERED_MARKER.replace(&result, "$1\\.$2").into_owned()
}

/// Trimmed attribute value, empty when missing
pub fn clean_attribute(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_inline_delimiters() {
        assert_eq!(escape_markdown("*test*"), "\\*test\\*");
        assert_eq!(escape_markdown("_test_"), "\\_test\\_");
        assert_eq!(escape_markdown("[link]"), "\\[link\\]");
        assert_eq!(escape_markdown("normal"), "normal");
    }

    #[test]
    fn test_inline_escape_leaves_block_markers() {
        assert_eq!(escape_markdown("- b"), "- b");
        assert_eq!(escape_markdown("+ 3"), "+ 3");
        assert_eq!(escape_markdown("# tag"), "# tag");
    }

    #[test]
    fn test_escape_line_start() {
        assert_eq!(escape_line_start("# not a heading"), "\\# not a heading");
        assert_eq!(escape_line_start(" - item"), " \\- item");
        assert_eq!(escape_line_start("well-formed #1"), "well-formed #1");
        assert_eq!(escape_line_start("1. first"), "1\\. first");
        assert_eq!(escape_line_start("version 1. ok"), "version 1. ok");
    }

    #[test]
    fn test_collapse_whitespace_keeps_nbsp() {
        assert_eq!(collapse_whitespace("a \n\t b"), "a b");
        assert_eq!(collapse_whitespace("a\u{a0}\u{a0}b"), "a\u{a0}\u{a0}b");
    }

    #[test]
    fn test_is_block() {
        assert!(is_block("div"));
        assert!(is_block("figure"));
        assert!(!is_block("span"));
        assert!(!is_block("iframe"));
    }

    #[test]
    fn test_is_void() {
        assert!(is_void("br"));
        assert!(is_void("img"));
        assert!(!is_void("div"));
    }

    #[test]
    fn test_clean_attribute() {
        assert_eq!(clean_attribute(Some("  a.png ")), "a.png");
        assert_eq!(clean_attribute(None), "");
    }
}
