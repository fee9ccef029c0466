//! MarkdownRuleEngine - the entry point for Node to Markdown conversion.

use markpage_core::{Block, Options};

use crate::convert::convert;
use crate::html::parse_html;
use crate::node::Node;
use crate::rules::{Filter, Rule, Rules};

/// Serializes document trees to Markdown.
///
/// Options and rules are fixed once the engine is handed out; conversion
/// itself only reads the input tree and never fails. Constructs with no
/// mapping degrade to their text content.
#[derive(Debug, Clone)]
pub struct MarkdownRuleEngine {
    options: Options,
    rules: Rules,
}

impl MarkdownRuleEngine {
    /// Default options, CommonMark mapping only
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            rules: Rules::new(),
        }
    }

    /// The engine used for page conversion: [`Options::page`] and
    /// [`Rules::page`].
    pub fn page() -> Self {
        Self {
            options: Options::page(),
            rules: Rules::page(),
        }
    }

    /// Add or replace a named rule
    pub fn add_rule(&mut self, key: &str, rule: Rule) -> &mut Self {
        self.rules.add(key, rule);
        self
    }

    /// Keep elements with these tags as HTML
    pub fn keep(&mut self, tags: &[&str]) -> &mut Self {
        self.rules.keep(Filter::tags(tags));
        self
    }

    /// Drop elements with these tags and their content
    pub fn remove(&mut self, tags: &[&str]) -> &mut Self {
        self.rules.remove(Filter::tags(tags));
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Markdown AST for a tree
    pub fn ast(&self, node: &Node) -> Block {
        convert(node, &self.options, &self.rules)
    }

    /// Convert a tree to Markdown
    pub fn serialize(&self, node: &Node) -> String {
        markpage_core::serialize(&self.ast(node), &self.options)
    }

    /// Parse an HTML fragment and convert it to Markdown
    pub fn serialize_html(&self, html: &str) -> String {
        self.serialize(&parse_html(html))
    }
}

impl Default for MarkdownRuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_engine_uses_setext() {
        let engine = MarkdownRuleEngine::new();
        assert_eq!(engine.serialize_html("<h1>Title</h1>"), "Title\n=====");
    }

    #[test]
    fn test_page_engine_options() {
        let engine = MarkdownRuleEngine::page();
        let markdown = engine.serialize_html(
            "<h1>T</h1><ul><li><em>a</em></li></ul><hr><pre><code>x</code></pre>",
        );
        assert_eq!(markdown, "# T\n\n-   _a_\n\n---\n\n```\nx\n```");
    }

    #[test]
    fn test_scenario_heading_and_bold() {
        let engine = MarkdownRuleEngine::page();
        let markdown = engine.serialize_html(
            "<div class=\"markdown-content\"><h1>Test Page</h1><p>Hello <b>World</b></p></div>",
        );
        assert_eq!(markdown, "# Test Page\n\nHello **World**");
    }

    #[test]
    fn test_style_block_is_byte_identical() {
        let style = "<style>p > a { color: red; }</style>";
        let markdown = MarkdownRuleEngine::page().serialize_html(&format!("<div>{style}</div>"));
        assert_eq!(markdown, style);
    }

    #[test]
    fn test_custom_keep_and_remove() {
        let mut engine = MarkdownRuleEngine::page();
        engine.keep(&["video"]).remove(&["aside"]);
        let markdown = engine.serialize_html(
            "<p>a</p><video src=\"v.mp4\"></video><aside>gone</aside>",
        );
        assert_eq!(markdown, "a\n\n<video src=\"v.mp4\"></video>");
    }

    #[test]
    fn test_engine_leaves_tree_untouched() {
        let tree = parse_html("<p>x</p><script>y</script>");
        let before = tree.clone();
        let _ = MarkdownRuleEngine::page().serialize(&tree);
        assert_eq!(tree, before);
    }

    #[test]
    fn test_script_blank_line_runs_survive() {
        let script = "<script>a();\n\n\n\nb();</script>";
        let markdown = MarkdownRuleEngine::page().serialize(&parse_html(script));
        assert_eq!(markdown, script);
    }

    #[test]
    fn test_pre_blank_line_runs_survive() {
        let markdown =
            MarkdownRuleEngine::page().serialize_html("<pre><code>x = 1\n\n\ny = 2</code></pre>");
        assert_eq!(markdown, "```\nx = 1\n\n\ny = 2\n```");
    }

    #[test]
    fn test_huge_list_start_does_not_overflow() {
        let markdown = MarkdownRuleEngine::page()
            .serialize_html("<ol start=\"4294967295\"><li>a</li><li>b</li></ol>");
        assert_eq!(markdown, "4294967295.  a\n4294967295.  b");
    }
}
