//! Element tree management
//!
//! Nodes live in a slotmap arena owned by [`Document`]. Removing a node
//! drops its whole subtree from the arena, so a held [`NodeId`] becomes
//! stale and [`Document::contains`] reports it gone. Query methods are
//! tolerant of stale keys; structural mutations on stale keys panic, the
//! same contract as indexing the underlying arena.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Key identifying an element in a [`Document`].
    pub struct NodeId;
}

/// A single element: tag, classes, attributes, optional text, children.
#[derive(Debug, Default)]
struct Node {
    tag: String,
    classes: SmallVec<[String; 4]>,
    attrs: FxHashMap<String, String>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// The retained element tree. One root `body` node exists for the lifetime
/// of the document; everything visible hangs off it.
#[derive(Debug)]
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    body: NodeId,
}

impl Document {
    /// Creates an empty document with a fresh `body` root.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(Node {
            tag: "body".to_string(),
            ..Node::default()
        });
        Self { nodes, body }
    }

    /// The root node everything attaches under.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Creates a detached element with the given tag.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.nodes.insert(Node {
            tag: tag.into(),
            ..Node::default()
        })
    }

    /// Whether the node still exists in the arena (attached or detached).
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    /// Whether the node is reachable from `body` through parent links.
    pub fn is_attached(&self, node: NodeId) -> bool {
        if !self.nodes.contains_key(node) {
            return false;
        }
        let mut current = node;
        while let Some(parent) = self.nodes[current].parent {
            current = parent;
        }
        current == self.body
    }

    /// Appends `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    ///
    /// # Panics
    ///
    /// Panics if either node has been removed from the document.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        assert!(self.nodes.contains_key(parent), "append to removed node");
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Removes `node` and its entire subtree from the document. The ids of
    /// removed nodes become stale. Removing the body root is not allowed.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.body || !self.nodes.contains_key(node) {
            return;
        }
        tracing::trace!(?node, "removing subtree");
        self.detach(node);
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(data) = self.nodes.remove(id) {
                stack.extend(data.children);
            }
        }
    }

    /// Unlinks `node` from its parent without destroying the subtree.
    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node].parent.take() {
            self.nodes[parent].children.retain(|&c| c != node);
        }
    }

    /// Parent of `node`, if attached to one.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    /// Children of `node` in insertion order. Empty for stale keys.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Number of children. Zero for stale keys.
    pub fn child_count(&self, node: NodeId) -> usize {
        self.children(node).len()
    }

    /// First child in insertion order.
    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.children(node).first().copied()
    }

    /// Tag the node was created with.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node).map(|n| n.tag.as_str())
    }

    /// Sets the node's text content. Text is inert data, never markup.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        self.nodes[node].text = Some(text.into());
    }

    /// Text content, if any.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node).and_then(|n| n.text.as_deref())
    }

    /// Sets a string attribute, replacing any previous value.
    pub fn set_attr(&mut self, node: NodeId, name: impl Into<String>, value: impl Into<String>) {
        self.nodes[node].attrs.insert(name.into(), value.into());
    }

    /// Attribute value, if set.
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(node).and_then(|n| n.attrs.get(name)).map(String::as_str)
    }

    /// Adds a class if not already present.
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        let classes = &mut self.nodes[node].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    /// Removes a class if present.
    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.nodes[node].classes.retain(|c| c != class);
    }

    /// Whether the node carries the class. False for stale keys.
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes
            .get(node)
            .map(|n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    /// All attached nodes under `body` carrying `class`, depth-first.
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants_with_class(self.body, class)
    }

    /// First attached node under `body` carrying `class` whose attribute
    /// `name` equals `value`.
    pub fn find_with_attr(&self, class: &str, name: &str, value: &str) -> Option<NodeId> {
        self.find_by_class(class)
            .into_iter()
            .find(|&n| self.attr(n, name) == Some(value))
    }

    /// Descendants of `root` (excluding `root` itself) carrying `class`,
    /// depth-first in child order.
    pub fn descendants_with_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.has_class(id, class) {
                found.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        found
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_has_empty_body() {
        let doc = Document::new();
        assert_eq!(doc.child_count(doc.body()), 0);
        assert_eq!(doc.tag(doc.body()), Some("body"));
    }

    #[test]
    fn created_element_is_detached_until_appended() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        assert!(doc.contains(div));
        assert!(!doc.is_attached(div));

        let body = doc.body();
        doc.append_child(body, div);
        assert!(doc.is_attached(div));
        assert_eq!(doc.parent(div), Some(body));
    }

    #[test]
    fn remove_drops_whole_subtree() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("span");
        let body = doc.body();
        doc.append_child(body, outer);
        doc.append_child(outer, inner);

        doc.remove(outer);
        assert!(!doc.contains(outer));
        assert!(!doc.contains(inner));
        assert_eq!(doc.child_count(body), 0);
    }

    #[test]
    fn remove_is_tolerant_of_stale_ids() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.remove(div);
        doc.remove(div); // second call is a no-op
        assert!(!doc.contains(div));
    }

    #[test]
    fn reappending_moves_between_parents() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(body, a);
        doc.append_child(body, b);

        doc.append_child(a, child);
        assert_eq!(doc.child_count(a), 1);

        doc.append_child(b, child);
        assert_eq!(doc.child_count(a), 0);
        assert_eq!(doc.child_count(b), 1);
        assert_eq!(doc.parent(child), Some(b));
    }

    #[test]
    fn children_preserve_insertion_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let first = doc.create_element("div");
        let second = doc.create_element("div");
        doc.append_child(body, first);
        doc.append_child(body, second);

        assert_eq!(doc.children(body), &[first, second]);
        assert_eq!(doc.first_child(body), Some(first));
    }

    #[test]
    fn class_list_add_remove() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.add_class(div, "enter");
        doc.add_class(div, "enter"); // idempotent
        assert!(doc.has_class(div, "enter"));

        doc.remove_class(div, "enter");
        assert!(!doc.has_class(div, "enter"));
    }

    #[test]
    fn find_with_attr_matches_class_and_attribute() {
        let mut doc = Document::new();
        let body = doc.body();
        let left = doc.create_element("div");
        let right = doc.create_element("div");
        for (node, pos) in [(left, "top-left"), (right, "top-right")] {
            doc.add_class(node, "tray");
            doc.set_attr(node, "data-position", pos);
            doc.append_child(body, node);
        }

        assert_eq!(doc.find_with_attr("tray", "data-position", "top-right"), Some(right));
        assert_eq!(doc.find_with_attr("tray", "data-position", "bottom-left"), None);
    }

    #[test]
    fn detached_nodes_are_invisible_to_queries() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.add_class(div, "tray");
        assert!(doc.find_by_class("tray").is_empty());
    }

    #[test]
    fn text_is_stored_verbatim() {
        let mut doc = Document::new();
        let span = doc.create_element("span");
        doc.set_text(span, "<script>alert(1)</script>");
        assert_eq!(doc.text(span), Some("<script>alert(1)</script>"));
    }

    #[test]
    fn queries_tolerate_stale_keys() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.remove(div);
        assert!(doc.children(div).is_empty());
        assert_eq!(doc.attr(div, "role"), None);
        assert!(!doc.has_class(div, "x"));
        assert!(!doc.is_attached(div));
    }
}
