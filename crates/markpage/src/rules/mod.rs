//! Rule system for HTML to Markdown conversion.

mod rule;

pub use rule::{Filter, Rule};

use indexmap::IndexMap;

use crate::node::Node;

/// Elements with no Markdown counterpart, preserved as HTML on pages
pub const PRESERVED_TAGS: &[&str] = &["iframe", "script", "style"];

/// Named rules, ordered by [`Rule::priority`] and then by insertion.
/// Elements no rule matches fall through to the CommonMark mapping.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    rules: IndexMap<String, Rule>,
}

impl Rules {
    /// No rules: everything goes through the CommonMark mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules used for page conversion: keep [`PRESERVED_TAGS`] verbatim and
    /// render figures with their captions.
    pub fn page() -> Self {
        let mut rules = Self::new();
        rules.keep(Filter::tags(PRESERVED_TAGS));
        rules.add("figures", Rule::Figure);
        rules
    }

    /// Add or replace a named rule
    pub fn add(&mut self, key: &str, rule: Rule) {
        self.rules.insert(key.to_string(), rule);
        self.rules.sort_by(|_, a, _, b| a.priority().cmp(&b.priority()));
    }

    pub fn keep(&mut self, filter: Filter) {
        let key = format!("keep-{}", self.rules.len());
        self.add(&key, Rule::Keep(filter));
    }

    pub fn remove(&mut self, filter: Filter) {
        let key = format!("remove-{}", self.rules.len());
        self.add(&key, Rule::Remove(filter));
    }

    /// First rule matching `node`, or `None` for the CommonMark mapping
    pub fn for_node(&self, node: &Node) -> Option<&Rule> {
        self.rules.values().find(|rule| rule.matches(node))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(key, rule)| (key.as_str(), rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_rules() {
        let rules = Rules::page();
        for tag in PRESERVED_TAGS {
            assert!(matches!(
                rules.for_node(&Node::element(tag)),
                Some(Rule::Keep(_))
            ));
        }
        assert_eq!(rules.for_node(&Node::element("figure")), Some(&Rule::Figure));
        assert_eq!(rules.for_node(&Node::element("p")), None);
    }

    #[test]
    fn test_keep_outranks_later_remove() {
        let mut rules = Rules::new();
        rules.remove(Filter::tag("video"));
        rules.keep(Filter::tag("video"));
        assert!(matches!(
            rules.for_node(&Node::element("video")),
            Some(Rule::Keep(_))
        ));
    }

    #[test]
    fn test_keep_outranks_figure() {
        let mut rules = Rules::page();
        rules.keep(Filter::tag("figure"));
        assert!(matches!(
            rules.for_node(&Node::element("figure")),
            Some(Rule::Keep(_))
        ));
    }

    #[test]
    fn test_add_replaces_by_key() {
        let mut rules = Rules::new();
        rules.add("media", Rule::Remove(Filter::tag("video")));
        rules.add("media", Rule::Remove(Filter::tag("audio")));
        assert_eq!(rules.iter().count(), 1);
        assert_eq!(rules.for_node(&Node::element("video")), None);
    }
}
