//! Attribute inheritance over generic node trees.

/// A tree node carrying string attributes.
///
/// Implemented by cheap copyable handles so the inheritance walk does not
/// depend on any particular document representation.
pub trait AttributedNode<'a>: Copy {
    /// The node's own value for `name`, if declared.
    fn attr(self, name: &str) -> Option<&'a str>;

    /// The enclosing node, if any.
    fn parent(self) -> Option<Self>;
}

/// Resolve `name` on the node itself or its nearest ancestor declaring it.
///
/// The first declaration found wins; values are never merged.
pub fn closest_attr<'a, N: AttributedNode<'a>>(node: N, name: &str) -> Option<&'a str> {
    let mut current = Some(node);

    while let Some(node) = current {
        if let Some(value) = node.attr(name) {
            return Some(value);
        }
        current = node.parent();
    }

    None
}
