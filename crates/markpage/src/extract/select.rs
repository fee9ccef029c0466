//! Main-content selection.

use tracing::debug;

use super::prune::prune;
use super::selector::Selector;
use crate::node::Node;

/// Main-content containers, highest priority first
pub const MAIN_CONTENT: &[Selector] = &[
    Selector::Tag("main"),
    Selector::Tag("article"),
    Selector::Class("content"),
    Selector::Class("post"),
    Selector::Class("entry"),
    Selector::Attr("role", "main"),
];

/// Inner HTML of the page's main content.
///
/// Selectors are tried in [`MAIN_CONTENT`] order; the first one with any
/// match wins, using its first match in document order. Without a match the
/// pruned `body` is used, or the pruned root when there is no `body`.
pub fn select(root: &Node) -> String {
    if let Some((selector, node)) = main_content(root) {
        debug!(%selector, "main content matched");
        return node.inner_html();
    }

    let pruned = prune(root);
    match pruned.find_first(|n| n.tag_name() == "body") {
        Some(body) => {
            debug!("no main content container, using pruned body");
            body.inner_html()
        }
        None => {
            debug!("no main content container or body, using pruned root");
            pruned.inner_html()
        }
    }
}

/// First main-content container by selector priority
pub fn main_content(root: &Node) -> Option<(Selector, &Node)> {
    MAIN_CONTENT.iter().find_map(|selector| {
        root.find_first(|n| selector.matches(n))
            .map(|node| (*selector, node))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::{parse_document, parse_html};

    #[test]
    fn test_main_wins_over_earlier_article() {
        let root = parse_html("<article>Teaser</article><main><p>Main</p></main>");
        assert_eq!(select(&root), "<p>Main</p>");
    }

    #[test]
    fn test_first_match_in_document_order() {
        let root = parse_html("<div class=\"post\">One</div><div class=\"post\">Two</div>");
        assert_eq!(select(&root), "One");
    }

    #[test]
    fn test_selector_priority_chain() {
        let root = parse_html(
            "<div role=\"main\">role</div><div class=\"entry\">entry</div><div class=\"content\">content</div>",
        );
        let (selector, node) = main_content(&root).unwrap();
        assert_eq!(selector, Selector::Class("content"));
        assert_eq!(node.text_content(), "content");
    }

    #[test]
    fn test_role_main_is_last_resort() {
        let root = parse_html("<div role=\"main\"><p>Landmark</p></div>");
        assert_eq!(select(&root), "<p>Landmark</p>");
    }

    #[test]
    fn test_falls_back_to_pruned_body() {
        let root = parse_document(
            "<html><head><title>T</title></head><body><nav>Menu</nav><p>Body text</p><footer>f</footer></body></html>",
        );
        assert_eq!(select(&root), "<p>Body text</p>");
    }

    #[test]
    fn test_falls_back_to_pruned_root_without_body() {
        let root = parse_html("<p>Loose</p><aside>side</aside>");
        assert_eq!(select(&root), "<p>Loose</p>");
    }

    #[test]
    fn test_matched_container_is_not_pruned_here() {
        let root = parse_html("<main><p>a</p><script>b()</script></main>");
        assert_eq!(select(&root), "<p>a</p><script>b()</script>");
    }
}
