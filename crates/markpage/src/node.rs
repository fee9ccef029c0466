//! Owned DOM snapshot used by every stage of the pipeline.
//!
//! A [`Node`] tree is a plain value: children are owned, attributes live in
//! an ordered map, and there are no parent pointers. Cloning a tree yields a
//! fully independent snapshot, so pruning a clone can never reach back into
//! the tree it came from.

use indexmap::IndexMap;

use crate::utilities::{is_raw_text, is_void};

/// Node types matching DOM nodeType values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Comment = 8,
    Document = 9,
    DocumentFragment = 11,
}

/// A node in a document snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub node_type: NodeType,

    /// Lowercase tag name for elements, `#text`, `#comment`, `#document`
    /// or `#document-fragment` otherwise
    pub node_name: String,

    /// Payload of text and comment nodes
    pub node_value: Option<String>,

    /// Attributes in source order
    pub attributes: IndexMap<String, String>,

    pub children: Vec<Node>,
}

impl Node {
    fn with_type(node_type: NodeType, node_name: &str, node_value: Option<String>) -> Self {
        Self {
            node_type,
            node_name: node_name.to_string(),
            node_value,
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn element(tag_name: &str) -> Self {
        Self::with_type(NodeType::Element, &tag_name.to_ascii_lowercase(), None)
    }

    pub fn element_with_attrs(tag_name: &str, attrs: &[(&str, &str)]) -> Self {
        let mut node = Self::element(tag_name);
        for (name, value) in attrs {
            node.set_attr(name, value);
        }
        node
    }

    pub fn text(content: &str) -> Self {
        Self::with_type(NodeType::Text, "#text", Some(content.to_string()))
    }

    pub fn comment(content: &str) -> Self {
        Self::with_type(NodeType::Comment, "#comment", Some(content.to_string()))
    }

    pub fn document() -> Self {
        Self::with_type(NodeType::Document, "#document", None)
    }

    pub fn document_fragment() -> Self {
        Self::with_type(NodeType::DocumentFragment, "#document-fragment", None)
    }

    /// Builder form of [`Node::add_child`]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Lowercase tag name; empty for non-element nodes
    pub fn tag_name(&self) -> &str {
        if self.is_element() {
            &self.node_name
        } else {
            ""
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Whether the whitespace-separated `class` list contains `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter()
    }

    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    /// All descendants in document (pre-)order, excluding `self`
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// First descendant in document order matching `predicate`
    pub fn find_first<P>(&self, mut predicate: P) -> Option<&Node>
    where
        P: FnMut(&Node) -> bool,
    {
        self.descendants().find(|n| predicate(*n))
    }

    /// Remove every descendant for which `remove` returns true, together
    /// with its subtree. Matching nodes are not descended into.
    pub fn remove_descendants<P>(&mut self, remove: &P)
    where
        P: Fn(&Node) -> bool,
    {
        self.children.retain(|child| !remove(child));
        for child in &mut self.children {
            child.remove_descendants(remove);
        }
    }

    /// Concatenated text of this node and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => out.push_str(self.node_value.as_deref().unwrap_or("")),
            NodeType::Comment => {}
            _ => {
                for child in &self.children {
                    child.push_text(out);
                }
            }
        }
    }

    /// Serialize this node as HTML.
    ///
    /// Text is escaped except inside raw-text elements (`script`, `style`,
    /// `iframe`, ...), so the output re-parses to an equal tree.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(false, &mut out);
        out
    }

    /// Serialize the children of this node as HTML
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        self.write_children(&mut out);
        out
    }

    fn write_children(&self, out: &mut String) {
        let raw = self.is_element() && is_raw_text(&self.node_name);
        for child in &self.children {
            child.write_html(raw, out);
        }
    }

    fn write_html(&self, raw_parent: bool, out: &mut String) {
        match self.node_type {
            NodeType::Text => {
                let text = self.node_value.as_deref().unwrap_or("");
                if raw_parent {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_html_text(text));
                }
            }
            NodeType::Comment => {
                out.push_str("<!--");
                out.push_str(self.node_value.as_deref().unwrap_or(""));
                out.push_str("-->");
            }
            NodeType::Element => {
                out.push('<');
                out.push_str(&self.node_name);
                for (name, value) in &self.attributes {
                    out.push(' ');
                    out.push_str(name);
                    if !value.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&escape_html_attr(value));
                        out.push('"');
                    }
                }
                out.push('>');

                if !is_void(&self.node_name) {
                    self.write_children(out);
                    out.push_str("</");
                    out.push_str(&self.node_name);
                    out.push('>');
                }
            }
            NodeType::Document | NodeType::DocumentFragment => self.write_children(out),
        }
    }
}

/// Pre-order iterator over the descendants of a [`Node`]
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

fn escape_html_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_html_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::element("div")
            .with_child(Node::element("p").with_child(Node::text("One")))
            .with_child(
                Node::element_with_attrs("section", &[("class", "post wide")])
                    .with_child(Node::element("p").with_child(Node::text("Two"))),
            )
    }

    #[test]
    fn test_create_element() {
        let node = Node::element("DIV");
        assert!(node.is_element());
        assert_eq!(node.tag_name(), "div");
    }

    #[test]
    fn test_text_node_has_no_tag() {
        let node = Node::text("Hello");
        assert!(node.is_text());
        assert_eq!(node.tag_name(), "");
        assert_eq!(node.text_content(), "Hello");
    }

    #[test]
    fn test_attributes_case_insensitive() {
        let node = Node::element_with_attrs("a", &[("HREF", "https://example.com")]);
        assert_eq!(node.attr("href"), Some("https://example.com"));
        assert_eq!(node.attr("Href"), Some("https://example.com"));
        assert!(!node.has_attr("title"));
    }

    #[test]
    fn test_has_class() {
        let node = Node::element_with_attrs("div", &[("class", " post  wide ")]);
        assert!(node.has_class("post"));
        assert!(node.has_class("wide"));
        assert!(!node.has_class("po"));
    }

    #[test]
    fn test_descendants_in_document_order() {
        let tree = sample();
        let tags: Vec<&str> = tree
            .descendants()
            .filter(|n| n.is_element())
            .map(Node::tag_name)
            .collect();
        assert_eq!(tags, vec!["p", "section", "p"]);
    }

    #[test]
    fn test_find_first_skips_self() {
        let tree = sample();
        assert!(tree.find_first(|n| n.tag_name() == "div").is_none());
        let section = tree.find_first(|n| n.has_class("post"));
        assert_eq!(section.map(Node::text_content), Some("Two".to_string()));
    }

    #[test]
    fn test_remove_descendants_leaves_original() {
        let original = sample();
        let mut copy = original.clone();
        copy.remove_descendants(&|n: &Node| n.tag_name() == "section");

        assert_eq!(copy.text_content(), "One");
        assert_eq!(original.text_content(), "OneTwo");
    }

    #[test]
    fn test_outer_html_escapes_text() {
        let p = Node::element("p").with_child(Node::text("a < b & c"));
        assert_eq!(p.outer_html(), "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_outer_html_keeps_script_raw() {
        let script = Node::element("script").with_child(Node::text("if (a < b) {}"));
        assert_eq!(script.outer_html(), "<script>if (a < b) {}</script>");
    }

    #[test]
    fn test_void_element_html() {
        let img = Node::element_with_attrs("img", &[("src", "test.png"), ("alt", "Test")]);
        assert_eq!(img.outer_html(), "<img src=\"test.png\" alt=\"Test\">");
        assert_eq!(Node::element("br").outer_html(), "<br>");
    }

    #[test]
    fn test_attribute_escaping() {
        let a = Node::element_with_attrs("a", &[("title", "say \"hi\"")])
            .with_child(Node::text("x"));
        assert_eq!(a.outer_html(), "<a title=\"say &quot;hi&quot;\">x</a>");
    }

    #[test]
    fn test_inner_html_of_fragment() {
        let fragment = Node::document_fragment()
            .with_child(Node::element("hr"))
            .with_child(Node::comment(" note "));
        assert_eq!(fragment.inner_html(), "<hr><!-- note -->");
        assert_eq!(fragment.outer_html(), "<hr><!-- note -->");
    }
}
