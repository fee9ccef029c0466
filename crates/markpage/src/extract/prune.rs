//! Removal of non-content nodes from a document snapshot.

use super::selector::Selector;
use crate::node::Node;

/// Nodes removed from the page before the main content is selected
pub const PAGE_NOISE: &[Selector] = &[
    Selector::Tag("script"),
    Selector::Tag("style"),
    Selector::Tag("nav"),
    Selector::Tag("footer"),
    Selector::Tag("aside"),
    Selector::Class("ads"),
    Selector::Class("comments"),
    Selector::Attr("role", "complementary"),
];

/// Nodes removed from an embedded frame's body
pub const FRAME_NOISE: &[Selector] = &[
    Selector::Tag("script"),
    Selector::Tag("style"),
    Selector::Tag("nav"),
    Selector::Tag("footer"),
    Selector::Tag("aside"),
    Selector::Class("ads"),
    Selector::Class("comments"),
];

/// A copy of `tree` without [`PAGE_NOISE`]
pub fn prune(tree: &Node) -> Node {
    prune_with(tree, PAGE_NOISE)
}

/// A copy of `tree` without [`FRAME_NOISE`]
pub fn prune_frame(tree: &Node) -> Node {
    prune_with(tree, FRAME_NOISE)
}

pub fn prune_with(tree: &Node, noise: &[Selector]) -> Node {
    let mut pruned = tree.clone();
    pruned.remove_descendants(&|node: &Node| Selector::matches_any(noise, node));
    pruned
}
