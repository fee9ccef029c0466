//! Rule and Filter types for HTML conversion.

use crate::node::Node;

/// Selects the elements a rule applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    TagName(String),
    TagNames(Vec<String>),
}

impl Filter {
    pub fn tag(name: &str) -> Self {
        Filter::TagName(name.to_ascii_lowercase())
    }

    pub fn tags(names: &[&str]) -> Self {
        Filter::TagNames(names.iter().map(|s| s.to_ascii_lowercase()).collect())
    }

    pub fn matches(&self, node: &Node) -> bool {
        let tag = node.tag_name();
        match self {
            Filter::TagName(t) => tag == t,
            Filter::TagNames(tags) => tags.iter().any(|t| t == tag),
        }
    }
}

/// A conversion rule that takes precedence over the CommonMark mapping.
///
/// The set is closed: each variant's behavior lives in the converter, so
/// the full precedence order can be read off [`Rule::priority`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Emit matching elements as their raw HTML
    Keep(Filter),
    /// Render `<figure>` as an image reference followed by its caption
    Figure,
    /// Drop matching elements together with their content
    Remove(Filter),
}

impl Rule {
    /// Lower runs first
    pub fn priority(&self) -> u8 {
        match self {
            Rule::Keep(_) => 0,
            Rule::Figure => 1,
            Rule::Remove(_) => 2,
        }
    }

    pub fn matches(&self, node: &Node) -> bool {
        if !node.is_element() {
            return false;
        }
        match self {
            Rule::Keep(filter) | Rule::Remove(filter) => filter.matches(node),
            Rule::Figure => node.tag_name() == "figure",
        }
    }
}
