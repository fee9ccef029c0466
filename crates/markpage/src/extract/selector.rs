//! The small selector vocabulary used by pruning and content selection.

use std::fmt;

use crate::node::Node;

/// A single simple selector: tag, class or exact attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Tag(&'static str),
    Class(&'static str),
    Attr(&'static str, &'static str),
}

impl Selector {
    pub fn matches(&self, node: &Node) -> bool {
        if !node.is_element() {
            return false;
        }
        match *self {
            Selector::Tag(tag) => node.tag_name() == tag,
            Selector::Class(class) => node.has_class(class),
            Selector::Attr(name, value) => node.attr(name) == Some(value),
        }
    }

    pub fn matches_any(selectors: &[Selector], node: &Node) -> bool {
        selectors.iter().any(|s| s.matches(node))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Tag(tag) => f.write_str(tag),
            Selector::Class(class) => write!(f, ".{class}"),
            Selector::Attr(name, value) => write!(f, "[{name}=\"{value}\"]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_as_css() {
        assert_eq!(Selector::Tag("main").to_string(), "main");
        assert_eq!(Selector::Class("post").to_string(), ".post");
        assert_eq!(
            Selector::Attr("role", "main").to_string(),
            "[role=\"main\"]"
        );
    }

    #[test]
    fn test_attr_requires_exact_value() {
        let node = Node::element_with_attrs("div", &[("role", "main navigation")]);
        assert!(!Selector::Attr("role", "main").matches(&node));
    }

    #[test]
    fn test_text_never_matches() {
        assert!(!Selector::Tag("#text").matches(&Node::text("x")));
    }
}
