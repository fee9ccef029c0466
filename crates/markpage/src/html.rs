//! HTML parsing support.
//!
//! Parses markup with scraper (html5ever) and copies the result into the
//! owned [`Node`] snapshot used by the rest of the crate.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::Node;

/// Parse an HTML fragment. The returned node is a document fragment whose
/// children are the parsed top-level nodes.
///
/// # Example
///
/// ```rust
/// use markpage::parse_html;
///
/// let fragment = parse_html("<h1>Hello <em>World</em></h1>");
/// assert_eq!(fragment.inner_html(), "<h1>Hello <em>World</em></h1>");
/// ```
pub fn parse_html(html: &str) -> Node {
    let document = Html::parse_fragment(html);
    let mut fragment = Node::document_fragment();
    copy_children(document.root_element(), &mut fragment);
    fragment
}

/// Parse a complete HTML document. The returned node is a document whose
/// single element child is `html`.
pub fn parse_document(html: &str) -> Node {
    let document = Html::parse_document(html);
    Node::document().with_child(copy_element(document.root_element()))
}

fn copy_element(element: ElementRef) -> Node {
    let mut node = Node::element(element.value().name());
    for (name, value) in element.value().attrs() {
        node.set_attr(name, value);
    }
    copy_children(element, &mut node);
    node
}

fn copy_children(element: ElementRef, into: &mut Node) {
    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => into.add_child(Node::text(&text.text)),
            ScraperNode::Comment(comment) => into.add_child(Node::comment(&comment.comment)),
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    into.add_child(copy_element(child_element));
                }
            }
            _ => {}
        }
    }
}
